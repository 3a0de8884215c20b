use derive_more::Display;

/// The compression configuration of an array.
///
/// Each [`Implementation`](super::Implementation) has its own compression model.
/// The native implementation describes compression as a codec with a JSON configuration, a foreign implementation as a named filter with an optional level and byte shuffling.
#[derive(Clone, Debug, PartialEq, Display)]
pub enum Compression {
    /// No compression.
    #[display("uncompressed")]
    Uncompressed,
    /// A codec configuration of the native implementation.
    Codec(CodecConfiguration),
    /// A filter configuration of a foreign implementation.
    Filter(FilterConfiguration),
}

impl From<CodecConfiguration> for Compression {
    fn from(configuration: CodecConfiguration) -> Self {
        Self::Codec(configuration)
    }
}

impl From<FilterConfiguration> for Compression {
    fn from(configuration: FilterConfiguration) -> Self {
        Self::Filter(configuration)
    }
}

/// A codec identifier and its configuration.
#[derive(Clone, Debug, PartialEq, Display)]
#[display("{name} {}", serde_json::to_string(configuration).unwrap_or_default())]
pub struct CodecConfiguration {
    name: String,
    configuration: serde_json::Map<String, serde_json::Value>,
}

impl CodecConfiguration {
    /// Create a new codec configuration.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        configuration: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self {
            name: name.into(),
            configuration,
        }
    }

    /// The codec identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The codec configuration.
    #[must_use]
    pub fn configuration(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.configuration
    }
}

/// A filter pipeline compression configuration.
#[derive(Clone, Debug, PartialEq, Eq, Display)]
#[display("{name} level={level:?} shuffle={shuffle}")]
pub struct FilterConfiguration {
    name: String,
    level: Option<u32>,
    shuffle: bool,
}

impl FilterConfiguration {
    /// Create a new filter configuration.
    #[must_use]
    pub fn new(name: impl Into<String>, level: Option<u32>, shuffle: bool) -> Self {
        Self {
            name: name.into(),
            level,
            shuffle,
        }
    }

    /// Deflate (gzip) compression at `level` with byte shuffling.
    #[must_use]
    pub fn gzip(level: u32) -> Self {
        Self::new("gzip", Some(level), true)
    }

    /// The filter identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The compression level, if any.
    #[must_use]
    pub const fn level(&self) -> Option<u32> {
        self.level
    }

    /// Returns true if byte shuffling precedes compression.
    #[must_use]
    pub const fn shuffle(&self) -> bool {
        self.shuffle
    }
}
