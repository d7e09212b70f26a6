//! Store-backed composer
//!
//! Component binaries live under `<store>/<fw_release>/<file>`, with file
//! names taken from the SoC's catalog entry. The composed image is written to
//! a private temporary file and renamed to a path owned by this request, so
//! concurrent requests for the same image never see each other's files or a
//! partially written one. The caller removes the artifact once served.
use crate::layout::{nor_chip_size, parse_flash_size, FlashLayout, KIB, MIB};
use crate::ImageComposer;
use chrono::Utc;
use flashgen_core::{
    image_filename, FirmwareArtifact, FirmwareEdition, FirmwareImageRequest, FlashType,
    FlashgenError, Result, Soc, ARTIFACT_CONTENT_TYPE,
};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Erased NOR flash reads back as 0xFF
const ERASED_BYTE: u8 = 0xFF;

/// A binary component referenced by a SoC's catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Bootloader,
    Kernel,
    Rootfs,
}

impl Component {
    pub const ALL: [Component; 3] = [Component::Bootloader, Component::Kernel, Component::Rootfs];

    /// Partition the component is written to
    pub fn partition(&self) -> &'static str {
        match self {
            Component::Bootloader => "boot",
            Component::Kernel => "kernel",
            Component::Rootfs => "rootfs",
        }
    }

    pub fn filename<'a>(&self, soc: &'a Soc) -> &'a str {
        match self {
            Component::Bootloader => &soc.uboot_filename,
            Component::Kernel => &soc.kernel,
            Component::Rootfs => &soc.linux_filename,
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Component::Bootloader => write!(f, "bootloader"),
            Component::Kernel => write!(f, "kernel"),
            Component::Rootfs => write!(f, "rootfs"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreComposer {
    store_dir: PathBuf,
    output_dir: PathBuf,
}

impl StoreComposer {
    pub fn new(store_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            store_dir: store_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn release_dir(&self, fw_release: &str) -> Result<PathBuf> {
        if fw_release.is_empty()
            || fw_release.contains(['/', '\\'])
            || fw_release.starts_with('.')
        {
            return Err(FlashgenError::InvalidImageRequest(format!(
                "invalid firmware release '{}'",
                fw_release
            )));
        }
        Ok(self.store_dir.join(fw_release))
    }

    fn read_component(&self, release_dir: &Path, soc: &Soc, component: Component) -> Result<Vec<u8>> {
        let filename = component.filename(soc);
        let path = release_dir.join(filename);

        if filename.is_empty() || Path::new(filename).components().count() != 1 {
            return Err(FlashgenError::MissingComponent {
                component: component.to_string(),
                path,
            });
        }

        fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FlashgenError::MissingComponent {
                component: component.to_string(),
                path: path.clone(),
            },
            _ => FlashgenError::Io(e),
        })
    }

    fn layout_for(&self, flash_type: &FlashType, request: &FirmwareImageRequest) -> Result<FlashLayout> {
        let chip_size = nor_chip_size(flash_type).ok_or_else(|| {
            FlashgenError::InvalidImageRequest(format!(
                "full images are only composed for NOR flash, not '{}'",
                flash_type
            ))
        })?;

        let flash_size = parse_flash_size(&request.flash_size)?;
        if flash_size != chip_size {
            return Err(FlashgenError::InvalidImageRequest(format!(
                "flash size {} KiB does not match {}",
                flash_size / KIB,
                flash_type
            )));
        }

        FlashLayout::nor(flash_size, &FirmwareEdition::from(request.fw_release.as_str()))
    }

    /// Write `image` to `<output_dir>/<id>-<filename>` through a temporary file
    fn write_atomically(&self, filename: &str, image: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let id = uuid::Uuid::new_v4();
        let final_path = self.output_dir.join(format!("{}-{}", id, filename));
        let temp_path = self.output_dir.join(format!(".{}-{}.tmp", id, filename));

        if let Err(e) = fs::write(&temp_path, image) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_path, &final_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        Ok(final_path)
    }
}

impl ImageComposer for StoreComposer {
    fn generate(&self, request: &FirmwareImageRequest) -> Result<FirmwareArtifact> {
        let soc = request.soc.as_ref();
        let flash_type = FlashType::from(request.flash_type.as_str());
        let layout = self.layout_for(&flash_type, request)?;
        let release_dir = self.release_dir(&request.fw_release)?;

        let mut image = vec![ERASED_BYTE; layout.flash_size as usize];
        for component in Component::ALL {
            let data = self.read_component(&release_dir, soc, component)?;
            let partition = layout
                .partition(component.partition())
                .ok_or_else(|| FlashgenError::InvalidImageRequest(format!(
                    "layout has no {} partition",
                    component.partition()
                )))?;

            if data.len() as u64 > partition.size {
                return Err(FlashgenError::ComponentTooLarge {
                    component: component.to_string(),
                    size: data.len() as u64,
                    limit: partition.size,
                });
            }

            let start = partition.offset as usize;
            image[start..start + data.len()].copy_from_slice(&data);
        }

        // Named from the parsed values so equivalent spellings share one name
        let filename = image_filename(
            &soc.model,
            flash_type.as_str(),
            &request.fw_release,
            &format!("{}m", layout.flash_size / MIB),
        );
        let digest = format!("blake3:{}", blake3::hash(&image));
        let path = self.write_atomically(&filename, &image)?;

        tracing::info!(
            soc = %soc.model,
            release = %request.fw_release,
            mtdparts = %layout.mtdparts(),
            digest = %digest,
            "image composed"
        );

        Ok(FirmwareArtifact {
            path,
            filename,
            content_type: ARTIFACT_CONTENT_TYPE.to_string(),
            size: image.len() as u64,
            digest,
            generated_at: Utc::now(),
        })
    }
}
