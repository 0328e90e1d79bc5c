use crate::{
    core::cell::Cell,
    quantity::{
        Zero,
        resistance::{Ohms, Siemens},
    },
};

/// Parallel group of cells.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct Module {
    id: usize,
    members: Vec<Cell>,

    /// Running sum of the members' conductances.
    total_conductance: Siemens,
}

impl Module {
    pub fn new(id: usize, capacity: usize) -> Self {
        Self { id, members: Vec::with_capacity(capacity), total_conductance: Siemens::ZERO }
    }

    pub const fn id(&self) -> usize {
        self.id
    }

    pub fn members(&self) -> &[Cell] {
        &self.members
    }

    pub const fn len(&self) -> usize {
        self.members.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub const fn total_conductance(&self) -> Siemens {
        self.total_conductance
    }

    /// Equivalent resistance of the parallel group, undefined for an empty module.
    pub fn resistance(&self) -> Option<Ohms> {
        (self.total_conductance > Siemens::ZERO).then(|| self.total_conductance.recip())
    }

    /// Sum the member conductances from scratch, bypassing the running total.
    pub fn recompute_conductance(&self) -> Siemens {
        self.members.iter().map(Cell::conductance).sum()
    }

    pub(super) fn push(&mut self, cell: Cell) {
        self.total_conductance += cell.conductance();
        self.members.push(cell);
    }
}
