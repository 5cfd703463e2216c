//! Tumor/normal library pairing

use draftrun_core::{Error, LibraryRef, MetadataDirectory, Phenotype, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Libraries of a run, split by role
///
/// A single-library run carries only `library_id`. A paired run carries the
/// normal library as `library_id` and the tumor library as
/// `tumor_library_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryPairing {
    /// Sole library, or the normal library of a pair
    pub library_id: String,
    /// Tumor library of a pair
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tumor_library_id: Option<String>,
}

/// Pair the libraries of a run by phenotype.
///
/// # Errors
///
/// `InvalidInput` for zero or more than two libraries, or when a pair lacks
/// a tumor or a normal library. Directory errors pass through.
pub fn pair_libraries(
    directory: &dyn MetadataDirectory,
    libraries: &[LibraryRef],
) -> Result<LibraryPairing> {
    match libraries {
        [] => Err(Error::InvalidInput("no libraries found".to_string())),
        [only] => Ok(LibraryPairing {
            library_id: only.library_id.clone(),
            tumor_library_id: None,
        }),
        [a, b] => {
            let mut tumor = None;
            let mut normal = None;
            for lib in [a, b] {
                match directory.get_library(&lib.orcabus_id)?.phenotype {
                    Some(Phenotype::Tumor) => tumor = Some(lib.library_id.clone()),
                    Some(Phenotype::Normal) => normal = Some(lib.library_id.clone()),
                    _ => {}
                }
            }
            let tumor = tumor
                .ok_or_else(|| Error::InvalidInput("no tumor library found".to_string()))?;
            let normal = normal
                .ok_or_else(|| Error::InvalidInput("no normal library found".to_string()))?;
            debug!(target: "draftrun::resolve", %tumor, %normal, "Libraries paired");
            Ok(LibraryPairing {
                library_id: normal,
                tumor_library_id: Some(tumor),
            })
        }
        more => Err(Error::InvalidInput(format!(
            "expected at most two libraries, found {}",
            more.len()
        ))),
    }
}
