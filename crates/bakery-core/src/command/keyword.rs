//! Case-insensitive keyword tables.
//!
//! Every closed set of words the grammar accepts (command kinds, sub-kinds,
//! flags with a fixed vocabulary) is declared with [`keyword_enum!`], which
//! generates a fieldless enum plus a static lowercase lookup table built on
//! first use.

use crate::error::ParseError;

/// A closed, case-insensitive vocabulary.
pub trait Keyword: Sized + Copy + 'static {
    /// Human-readable name of the vocabulary, used in error messages.
    const LABEL: &'static str;

    /// Case-insensitive lookup by canonical name or alias.
    fn lookup(token: &str) -> Option<Self>;

    /// Canonical spelling.
    fn name(&self) -> &'static str;
}

/// Parse `token` as a member of `T`.
///
/// Tokens made of anything but ASCII letters and underscores are rejected
/// before the table lookup.
pub fn parse_keyword<T: Keyword>(token: &str) -> Result<T, ParseError> {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_alphabetic() || c == '_') {
        return Err(ParseError::InvalidKeywordToken { label: T::LABEL, token: token.to_string() });
    }
    T::lookup(token).ok_or_else(|| ParseError::UnknownKeyword { label: T::LABEL, token: token.to_string() })
}

/// Declares a keyword enum.
///
/// ```ignore
/// keyword_enum! {
///     pub enum BeepType: "BeepType" {
///         Ok | "OK",
///         Error,
///     }
/// }
/// ```
///
/// Each variant matches its own name case-insensitively plus any listed
/// aliases.
macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $label:literal {
            $(
                $(#[$vmeta:meta])*
                $variant:ident $(| $alias:literal)*
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )*
        }

        impl $name {
            #[allow(dead_code)]
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            pub fn name(&self) -> &'static str {
                match self {
                    $( $name::$variant => stringify!($variant), )*
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl $crate::command::keyword::Keyword for $name {
            const LABEL: &'static str = $label;

            fn lookup(token: &str) -> Option<Self> {
                static TABLE: std::sync::LazyLock<std::collections::HashMap<String, $name>> =
                    std::sync::LazyLock::new(|| {
                        let mut table = std::collections::HashMap::new();
                        $(
                            table.insert(stringify!($variant).to_ascii_lowercase(), $name::$variant);
                            $( table.insert(String::from($alias).to_ascii_lowercase(), $name::$variant); )*
                        )*
                        table
                    });
                TABLE.get(&token.to_ascii_lowercase()).copied()
            }

            fn name(&self) -> &'static str {
                $name::name(self)
            }
        }
    };
}

pub(crate) use keyword_enum;

#[cfg(test)]
mod tests {
    use super::*;

    keyword_enum! {
        enum Fruit: "Fruit" {
            Apple | "Malus",
            BloodOrange,
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(Fruit::lookup("APPLE"), Some(Fruit::Apple));
        assert_eq!(Fruit::lookup("bloodorange"), Some(Fruit::BloodOrange));
        assert_eq!(Fruit::lookup("malus"), Some(Fruit::Apple));
        assert_eq!(Fruit::lookup("Pear"), None);
    }

    #[test]
    fn test_name_and_all() {
        assert_eq!(Fruit::BloodOrange.name(), "BloodOrange");
        assert_eq!(Fruit::Apple.to_string(), "Apple");
        assert_eq!(Fruit::ALL.len(), 2);
    }

    #[test]
    fn test_parse_keyword_errors() {
        match parse_keyword::<Fruit>("App1e") {
            Err(ParseError::InvalidKeywordToken { label, token }) => {
                assert_eq!(label, "Fruit");
                assert_eq!(token, "App1e");
            }
            other => panic!("Expected InvalidKeywordToken, got {:?}", other),
        }
        match parse_keyword::<Fruit>("Pear") {
            Err(ParseError::UnknownKeyword { token, .. }) => assert_eq!(token, "Pear"),
            other => panic!("Expected UnknownKeyword, got {:?}", other),
        }
        assert_eq!(parse_keyword::<Fruit>("blood_orange").ok(), None);
        assert_eq!(parse_keyword::<Fruit>("BLOODORANGE").ok(), Some(Fruit::BloodOrange));
    }
}
