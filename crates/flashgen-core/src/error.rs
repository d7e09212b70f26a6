//! Unified Error Model
use crate::data_model::Quirk;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlashgenError {
    #[error("NOT_FOUND/{entity} '{id}'")]
    NotFound { entity: &'static str, id: String },

    #[error("COMPONENT/missing {component}: {}", path.display())]
    MissingComponent { component: String, path: PathBuf },

    #[error("UNSUPPORTED/{0}")]
    UnsupportedCombination(Quirk),

    #[error("IMAGE/{0}")]
    InvalidImageRequest(String),

    #[error("IMAGE/{component} is {size} bytes, partition holds {limit}")]
    ComponentTooLarge {
        component: String,
        size: u64,
        limit: u64,
    },

    #[error("CATALOG/{0}")]
    Catalog(String),

    #[error("IO/{0}")]
    Io(#[from] std::io::Error),
}

impl FlashgenError {
    pub fn soc_not_found(id: impl Into<String>) -> Self {
        FlashgenError::NotFound {
            entity: "soc",
            id: id.into(),
        }
    }

    pub fn vendor_not_found(id: impl Into<String>) -> Self {
        FlashgenError::NotFound {
            entity: "vendor",
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FlashgenError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, FlashgenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = FlashgenError::soc_not_found("NOPE");
        assert_eq!(err.to_string(), "NOT_FOUND/soc 'NOPE'");
        assert!(err.is_not_found());

        let err = FlashgenError::MissingComponent {
            component: "rootfs".to_string(),
            path: PathBuf::from("store/rootfs.squashfs.t31"),
        };
        assert_eq!(
            err.to_string(),
            "COMPONENT/missing rootfs: store/rootfs.squashfs.t31"
        );

        let err = FlashgenError::UnsupportedCombination(Quirk::Hi3536Unsupported);
        assert_eq!(err.to_string(), "UNSUPPORTED/hi3536_unsupported");
    }
}
