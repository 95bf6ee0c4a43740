//! Public object storage URLs.

use url::Url;

/// Build the public URL of an object in a storage bucket.
///
/// Each path segment of `key` is percent-encoded. References that are
/// already absolute (`http…`) are returned unchanged.
#[must_use]
pub fn public_object_url(base: &Url, bucket: &str, key: &str) -> String {
    if key.starts_with("http") {
        return key.to_string();
    }

    let encoded = key
        .trim_start_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");

    format!(
        "{}/storage/v1/object/public/{bucket}/{encoded}",
        base.as_str().trim_end_matches('/')
    )
}

/// A public bucket on the backend's object storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicBucket {
    base: Url,
    bucket: String,
}

impl PublicBucket {
    #[must_use]
    pub fn new(base: Url, bucket: impl Into<String>) -> Self {
        Self {
            base,
            bucket: bucket.into(),
        }
    }

    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Public URL for a key (or an absolute URL, unchanged).
    #[must_use]
    pub fn object_url(&self, key: &str) -> String {
        public_object_url(&self.base, &self.bucket, key)
    }
}
