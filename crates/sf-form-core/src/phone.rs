//! Dialing prefixes and a mask formatter used when the external
//! as-you-type formatter is unavailable.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhoneCountry {
    pub code: &'static str,
    pub flag: &'static str,
    pub dial: &'static str,
    /// `X` marks a digit slot.
    pub mask: &'static str,
}

pub const DEFAULT_PHONE_COUNTRY: &str = "NG";

const PHONE_COUNTRIES: &[PhoneCountry] = &[
    PhoneCountry { code: "US", flag: "🇺🇸", dial: "+1", mask: "(XXX) XXX-XXXX" },
    PhoneCountry { code: "GB", flag: "🇬🇧", dial: "+44", mask: "XXXX XXXXXX" },
    PhoneCountry { code: "JP", flag: "🇯🇵", dial: "+81", mask: "XX-XXXX-XXXX" },
    PhoneCountry { code: "KR", flag: "🇰🇷", dial: "+82", mask: "XX-XXXX-XXXX" },
    PhoneCountry { code: "CN", flag: "🇨🇳", dial: "+86", mask: "XXX XXXX XXXX" },
    PhoneCountry { code: "FR", flag: "🇫🇷", dial: "+33", mask: "X XX XX XX XX" },
    PhoneCountry { code: "DE", flag: "🇩🇪", dial: "+49", mask: "XXXX XXXXXXX" },
    PhoneCountry { code: "IN", flag: "🇮🇳", dial: "+91", mask: "XXXXX-XXXXX" },
    PhoneCountry { code: "BR", flag: "🇧🇷", dial: "+55", mask: "(XX) XXXXX-XXXX" },
    PhoneCountry { code: "CA", flag: "🇨🇦", dial: "+1", mask: "(XXX) XXX-XXXX" },
    PhoneCountry { code: "NG", flag: "🇳🇬", dial: "+234", mask: "XXX XXX XXXX" },
];

/// Phone metadata for a country, falling back to Nigeria.
pub fn phone_country(code: &str) -> &'static PhoneCountry {
    let code = code.trim().to_uppercase();
    PHONE_COUNTRIES
        .iter()
        .find(|c| c.code == code)
        .or_else(|| PHONE_COUNTRIES.iter().find(|c| c.code == DEFAULT_PHONE_COUNTRY))
        .unwrap_or(&PHONE_COUNTRIES[0])
}

impl PhoneCountry {
    /// Text shown in the prefix badge next to the phone input.
    pub fn prefix_label(&self) -> String {
        format!("{} {}", self.flag, self.dial)
    }

    /// Lay the digits of `input` into the mask. Literal characters are only
    /// emitted while digits remain; surplus digits are appended unformatted.
    /// A leading `+` means the user typed an international number, which is
    /// left untouched apart from stripping stray characters.
    pub fn format(&self, input: &str) -> String {
        let trimmed = input.trim_start();
        if trimmed.starts_with('+') {
            let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
            return format!("+{digits}");
        }

        let mut digits = input.chars().filter(|c| c.is_ascii_digit()).peekable();
        let mut out = String::with_capacity(self.mask.len());
        let mut pending = String::new();

        for slot in self.mask.chars() {
            if digits.peek().is_none() {
                break;
            }
            if slot == 'X' {
                out.push_str(&pending);
                pending.clear();
                if let Some(d) = digits.next() {
                    out.push(d);
                }
            } else if out.is_empty() && slot == '(' {
                out.push(slot);
            } else {
                pending.push(slot);
            }
        }
        out.extend(digits);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_country_falls_back_to_nigeria() {
        assert_eq!(phone_country("zz").code, "NG");
        assert_eq!(phone_country("").prefix_label(), "🇳🇬 +234");
        assert_eq!(phone_country("jp").dial, "+81");
    }

    #[test]
    fn mask_formats_complete_and_partial_numbers() {
        let us = phone_country("US");
        assert_eq!(us.format("5551234567"), "(555) 123-4567");
        assert_eq!(us.format("555123"), "(555) 123");
        assert_eq!(us.format("555"), "(555");

        let ng = phone_country("NG");
        assert_eq!(ng.format("803-123-4567"), "803 123 4567");
        assert_eq!(ng.format("80312345678"), "803 123 45678");
        assert_eq!(ng.format(""), "");
    }

    #[test]
    fn international_input_is_not_masked() {
        assert_eq!(phone_country("GB").format("+44 20 7946 0958"), "+442079460958");
    }
}
