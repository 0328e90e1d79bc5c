use std::ops::Div;

use crate::quantity::{current::Amperes, resistance::Ohms};

quantity!(Volts, "V");

impl Div<Amperes> for Volts {
    type Output = Ohms;

    fn div(self, rhs: Amperes) -> Self::Output {
        Ohms(self.0 / rhs.0)
    }
}
