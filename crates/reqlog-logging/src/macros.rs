//! Attribute list shorthand

/// Build a `Vec<Attr>` from `key => value` pairs
///
/// # Example
///
/// ```
/// use reqlog_logging::{attrs, Attr};
///
/// let fields = attrs!["bucket" => "avatars", "bytes" => 1024u64];
/// assert_eq!(fields[0], Attr::new("bucket", "avatars"));
/// assert_eq!(fields.len(), 2);
///
/// let none = attrs![];
/// assert!(none.is_empty());
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        ::std::vec::Vec::<$crate::Attr>::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Attr::new($key, $value)),+]
    };
}
