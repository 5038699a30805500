//! Files as the host upload pipeline sees them.

/// A file in the host's upload batch.
///
/// `uid` is the host's stable identity token. An edited file keeps the
/// original's `uid`, `name` and `mime` so the host treats it as the same
/// entry with new content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub uid: String,
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(
        uid: impl Into<String>,
        name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Same identity (uid, name, MIME type) with different content.
    pub fn with_bytes(&self, bytes: Vec<u8>) -> Self {
        Self {
            uid: self.uid.clone(),
            name: self.name.clone(),
            mime: self.mime.clone(),
            bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_bytes_keeps_identity() {
        let original = UploadFile::new("rc-1", "cat.jpg", "image/jpeg", vec![1, 2, 3]);
        let edited = original.with_bytes(vec![9]);
        assert_eq!(edited.uid, "rc-1");
        assert_eq!(edited.name, "cat.jpg");
        assert_eq!(edited.mime, "image/jpeg");
        assert_eq!(edited.bytes, vec![9]);
    }
}
