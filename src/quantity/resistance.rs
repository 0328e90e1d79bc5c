quantity!(Ohms, "Ω");
quantity!(Siemens, "S");

impl Ohms {
    /// Conductance of the resistor.
    pub fn recip(self) -> Siemens {
        Siemens(self.0.recip())
    }
}

impl Siemens {
    /// Resistance of the conductor.
    pub fn recip(self) -> Ohms {
        Ohms(self.0.recip())
    }
}
