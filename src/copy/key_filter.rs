use regex::{Regex, RegexBuilder};

use crate::error::CopyError;

/// Regular expression flags shared by the exclude and include patterns of a [`KeyFilter`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[allow(clippy::struct_excessive_bools)]
pub struct RegexFlags {
    /// Match letters case insensitively.
    pub case_insensitive: bool,
    /// `^` and `$` match at the beginning and end of lines.
    pub multi_line: bool,
    /// `.` matches any character, including a new line.
    pub dot_matches_new_line: bool,
    /// Ignore whitespace and allow `#` comments in patterns.
    pub ignore_whitespace: bool,
}

/// Decides whether a key is copied, based on exclude and include regular expressions.
///
/// A key is excluded if any exclude pattern matches it and no include pattern matches it.
/// A pattern matches if it is found anywhere in the key.
///
/// ```rust
/// # use zarrs_copy::copy::{KeyFilter, RegexFlags};
/// let filter = KeyFilter::new([r"\.zattrs$"], [r"^keep/"], RegexFlags::default())?;
/// assert!(filter.should_copy("foo/0"));
/// assert!(!filter.should_copy("foo/.zattrs"));
/// assert!(filter.should_copy("keep/.zattrs"));
/// # Ok::<(), zarrs_copy::CopyError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct KeyFilter {
    excludes: Vec<Regex>,
    includes: Vec<Regex>,
}

impl KeyFilter {
    /// Create a new key filter from exclude and include patterns compiled with `flags`.
    ///
    /// # Errors
    /// Returns [`CopyError::InvalidArgument`] if a pattern is not a valid regular expression.
    pub fn new<E, I>(excludes: E, includes: I, flags: RegexFlags) -> Result<Self, CopyError>
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let compile = |pattern: &str| {
            RegexBuilder::new(pattern)
                .case_insensitive(flags.case_insensitive)
                .multi_line(flags.multi_line)
                .dot_matches_new_line(flags.dot_matches_new_line)
                .ignore_whitespace(flags.ignore_whitespace)
                .build()
        };
        Ok(Self {
            excludes: excludes
                .into_iter()
                .map(|pattern| compile(pattern.as_ref()))
                .collect::<Result<_, _>>()?,
            includes: includes
                .into_iter()
                .map(|pattern| compile(pattern.as_ref()))
                .collect::<Result<_, _>>()?,
        })
    }

    /// Create a key filter that excludes nothing.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns true if `key` should be copied.
    #[must_use]
    pub fn should_copy(&self, key: &str) -> bool {
        !self.excludes.iter().any(|exclude| exclude.is_match(key))
            || self.includes.iter().any(|include| include.is_match(key))
    }
}
