use std::ops::Mul;

use crate::quantity::{resistance::Ohms, voltage::Volts};

quantity!(Amperes, "A");

impl Mul<Ohms> for Amperes {
    type Output = Volts;

    fn mul(self, rhs: Ohms) -> Self::Output {
        Volts(self.0 * rhs.0)
    }
}
