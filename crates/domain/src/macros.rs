//! Macro for implementing Display and FromStr for label enums
//!
//! Configuration values such as the provider kind are written as short
//! lowercase labels in config files and environment variables. This macro
//! keeps the label table in one place and gives both directions of the
//! conversion.
//!
//! # Example
//!
//! ```rust
//! use harvest_domain::impl_label_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Weekday {
//!     Monday,
//!     Friday,
//! }
//!
//! impl_label_conversions!(Weekday {
//!     Monday => "monday",
//!     Friday => "friday",
//! });
//!
//! assert_eq!("FRIDAY".parse::<Weekday>().unwrap(), Weekday::Friday);
//! ```

/// Implements Display and FromStr for label enums
///
/// - Display writes the label verbatim
/// - FromStr matches labels case-insensitively after trimming and fails with
///   [`HarvestError::InvalidInput`](crate::HarvestError::InvalidInput)
#[macro_export]
macro_rules! impl_label_conversions {
    ($enum_name:ident { $($variant:ident => $label:expr),+ $(,)? }) => {
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($label),)+
                }
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = $crate::HarvestError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($label => Ok(Self::$variant),)+
                    _ => Err($crate::HarvestError::InvalidInput(format!(
                        "unknown {}: '{}'",
                        stringify!($enum_name),
                        s
                    ))),
                }
            }
        }
    };
}
