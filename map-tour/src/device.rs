/// Which experience a window of a given width gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    /// Runs the tour.
    Mobile,
    /// Only shows a message asking for a phone.
    Desktop,
}

impl DeviceClass {
    pub fn classify(width: f32, max_mobile_width: f32) -> Self {
        if width <= max_mobile_width {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    pub fn is_mobile(&self) -> bool {
        matches!(self, DeviceClass::Mobile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_width_is_mobile() {
        assert_eq!(DeviceClass::classify(768.0, 768.0), DeviceClass::Mobile);
        assert_eq!(DeviceClass::classify(390.0, 768.0), DeviceClass::Mobile);
        assert_eq!(DeviceClass::classify(768.5, 768.0), DeviceClass::Desktop);
        assert!(!DeviceClass::classify(1920.0, 768.0).is_mobile());
    }
}
