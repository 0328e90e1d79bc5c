use std::fmt::{Debug, Display, Formatter};

/// Percentage that is already scaled to `0..=100`.
pub struct FormattedPercentage(pub f64);

impl Debug for FormattedPercentage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for FormattedPercentage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)?;
        write!(f, "%")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precision_is_forwarded() {
        assert_eq!(format!("{:.4}", FormattedPercentage(1.234_56)), "1.2346%");
    }
}
