//! Style contract shared by every styled renderer.
//! Each backend maps these onto its own primitives (genpdf styles, OOXML run
//! properties, inline CSS).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Upper-case hex without `#`, as OOXML expects.
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

pub const TITLE: &str = "Statement of Work";

/// Section headers and table header backgrounds.
pub const ACCENT_A: Rgb = Rgb(0x70, 0x7C, 0xF1);
/// Subheaders.
pub const ACCENT_B: Rgb = Rgb(0x39, 0x33, 0x92);
pub const TEXT: Rgb = Rgb(0x00, 0x00, 0x00);
/// Text drawn on an accent background.
pub const INVERSE_TEXT: Rgb = Rgb(0xFF, 0xFF, 0xFF);
pub const TABLE_BORDER: Rgb = Rgb(0xDD, 0xDD, 0xDD);

// Font sizes in points.
pub const TITLE_SIZE: u8 = 20;
pub const SECTION_SIZE: u8 = 16;
pub const SUBHEADER_SIZE: u8 = 13;
pub const BODY_SIZE: u8 = 10;

pub const FONT_NAME: &str = "Verdana";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_is_zero_padded_upper_case() {
        assert_eq!(ACCENT_A.hex(), "707CF1");
        assert_eq!(Rgb(0, 10, 255).hex(), "000AFF");
    }
}
