//! Macro for implementing Display and FromStr for label enums
//!
//! Several small enums travel through configuration files and log fields as
//! lowercase labels (`LocationPolicy`, `ApiRoute`). The macro keeps the
//! mapping in one place and parses case-insensitively.
//!
//! # Example
//!
//! ```rust
//! use punchclock_domain::impl_label_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Shift {
//!     Day,
//!     Night,
//! }
//!
//! impl_label_conversions!(Shift {
//!     Day => "day",
//!     Night => "night",
//! });
//!
//! assert_eq!(Shift::Night.to_string(), "night");
//! assert_eq!("DAY".parse::<Shift>(), Ok(Shift::Day));
//! ```

/// Implements Display and FromStr for an enum of lowercase labels.
#[macro_export]
macro_rules! impl_label_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Lane {
        Express,
        Standard,
    }

    impl_label_conversions!(Lane {
        Express => "express",
        Standard => "standard",
    });

    #[test]
    fn test_display_conversion() {
        assert_eq!(Lane::Express.to_string(), "express");
        assert_eq!(Lane::Standard.to_string(), "standard");
    }

    #[test]
    fn test_fromstr_is_case_insensitive() {
        assert_eq!(Lane::from_str("express").unwrap(), Lane::Express);
        assert_eq!(Lane::from_str(" STANDARD ").unwrap(), Lane::Standard);
    }

    mod with_result_alias {
        // A crate-local one-argument alias must not leak into the expansion.
        #[allow(dead_code)]
        type Result<T> = std::result::Result<T, crate::errors::PunchClockError>;

        #[derive(Debug, PartialEq, Eq)]
        pub(super) enum Shift {
            Day,
            Night,
        }

        impl_label_conversions!(Shift {
            Day => "day",
            Night => "night",
        });
    }

    #[test]
    fn test_expands_beside_result_alias() {
        use with_result_alias::Shift;

        assert_eq!("Night".parse::<Shift>(), Ok(Shift::Night));
        assert_eq!(Shift::Day.to_string(), "day");
    }

    #[test]
    fn test_fromstr_invalid() {
        let result = Lane::from_str("overnight");
        assert!(result.unwrap_err().contains("Invalid Lane: overnight"));
        assert!(Lane::from_str("").is_err());
    }
}
