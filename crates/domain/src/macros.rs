//! Status enum string conversions
//!
//! Every status column stores the lowercase string form of a closed enum.
//! `impl_status_str!` wires up both directions: `Display` for persistence
//! and rendering, `FromStr` for stored rows and caller-supplied filters.

/// Implements `Display` and case-insensitive `FromStr` for a status enum.
///
/// ```rust
/// use oficina_domain::impl_status_str;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// pub enum Stage {
///     Queued,
///     Done,
/// }
///
/// impl_status_str!(Stage { Queued => "queued", Done => "done" });
/// ```
#[macro_export]
macro_rules! impl_status_str {
    ($name:ident { $($variant:ident => $text:expr),+ $(,)? }) => {
        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let text = match self {
                    $(Self::$variant => $text,)+
                };
                f.write_str(text)
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(format!("unknown {} value: {s}", stringify!($name))),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Stage {
        Queued,
        Active,
        Done,
    }

    impl_status_str!(Stage { Queued => "queued", Active => "active", Done => "done" });

    #[test]
    fn display_matches_the_stored_form() {
        assert_eq!(Stage::Queued.to_string(), "queued");
        assert_eq!(Stage::Done.to_string(), "done");
    }

    #[test]
    fn parsing_ignores_case() {
        assert_eq!(Stage::from_str("ACTIVE").unwrap(), Stage::Active);
        assert_eq!(Stage::from_str("qUeUeD").unwrap(), Stage::Queued);
    }

    #[test]
    fn unknown_values_are_rejected() {
        let err = Stage::from_str("archived").unwrap_err();
        assert!(err.contains("unknown Stage value: archived"));
    }
}
