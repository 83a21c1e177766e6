use chrono::{DateTime, FixedOffset, Local, SubsecRound};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hash::{hex_or_empty, Hash};

/// a commit object pointing to a tree with metadata
///
/// `hash` is self-referential: it is the digest of this record serialized
/// with `hash` blank. see [`CommitDraft::seal`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// own digest (blank while unsealed)
    #[serde(with = "hex_or_empty")]
    pub hash: Option<Hash>,
    /// parent commit (blank for the first commit)
    #[serde(with = "hex_or_empty")]
    pub parent: Option<Hash>,
    /// creation time, RFC 3339 with local offset
    #[serde(with = "rfc3339")]
    pub timestamp: DateTime<FixedOffset>,
    /// author identity, `name <email>`
    pub author: String,
    /// commit message
    pub message: String,
    /// root tree hash
    pub tree: Hash,
}

impl Commit {
    /// is this the first commit (no parent)
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// a commit that has not been hashed yet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitDraft {
    pub tree: Hash,
    pub parent: Option<Hash>,
    pub author: String,
    pub timestamp: DateTime<FixedOffset>,
    pub message: String,
}

/// a hashed commit together with its final serialized bytes
#[derive(Clone, Debug)]
pub struct SealedCommit {
    pub hash: Hash,
    pub commit: Commit,
    pub bytes: Vec<u8>,
}

impl CommitDraft {
    /// create a draft stamped with the current local time (second precision)
    pub fn new(
        tree: Hash,
        parent: Option<Hash>,
        author: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let now = Local::now().fixed_offset().trunc_subsecs(0);
        Self::with_timestamp(tree, parent, author, now, message)
    }

    /// create a draft with explicit timestamp
    pub fn with_timestamp(
        tree: Hash,
        parent: Option<Hash>,
        author: impl Into<String>,
        timestamp: DateTime<FixedOffset>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            tree,
            parent,
            author: author.into(),
            timestamp,
            message: message.into(),
        }
    }

    /// hash the draft and stamp the digest into the record
    ///
    /// pass one serializes with `hash` blank and digests those bytes; pass two
    /// re-serializes with `hash` filled in. the stored bytes are the second
    /// pass, the object key is the digest of the first.
    pub fn seal(self) -> Result<SealedCommit> {
        let mut commit = Commit {
            hash: None,
            parent: self.parent,
            timestamp: self.timestamp,
            author: self.author,
            message: self.message,
            tree: self.tree,
        };

        let unsealed = serde_json::to_vec(&commit).map_err(Error::Serialize)?;
        let hash = Hash::digest(&unsealed);

        commit.hash = Some(hash);
        let bytes = serde_json::to_vec(&commit).map_err(Error::Serialize)?;

        Ok(SealedCommit {
            hash,
            commit,
            bytes,
        })
    }
}

/// RFC 3339 timestamps at second precision, e.g. `2024-05-01T12:30:00+02:00`
mod rfc3339 {
    use chrono::{DateTime, FixedOffset, SecondsFormat};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s).map_err(serde::de::Error::custom)
    }
}
