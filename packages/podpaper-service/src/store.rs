use std::{
	fs, io,
	path::{Path, PathBuf},
};

use crate::{Error, Result};
use podpaper_domain::profile::ProfileSnapshot;

/// JSON file holding one persisted profile.
#[derive(Debug, Clone)]
pub struct ProfileStore {
	path: PathBuf,
}
impl ProfileStore {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Reads the stored snapshot. A missing file is `Ok(None)`.
	pub fn load(&self) -> Result<Option<ProfileSnapshot>> {
		let raw = match fs::read_to_string(&self.path) {
			Ok(raw) => raw,
			Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
			Err(err) => {
				return Err(Error::Storage {
					message: format!("Failed to read {}: {err}", self.path.display()),
				});
			},
		};
		let snapshot = serde_json::from_str(&raw).map_err(|err| Error::Storage {
			message: format!("Failed to parse {}: {err}", self.path.display()),
		})?;

		Ok(Some(snapshot))
	}

	/// Writes the snapshot to a sibling temporary file, then renames it over the target.
	pub fn save(&self, snapshot: &ProfileSnapshot) -> Result<()> {
		let payload = serde_json::to_string_pretty(snapshot).map_err(|err| Error::Storage {
			message: format!("Failed to serialize profile: {err}"),
		})?;

		if let Some(parent) = self.path.parent()
			&& !parent.as_os_str().is_empty()
		{
			fs::create_dir_all(parent).map_err(|err| Error::Storage {
				message: format!("Failed to create {}: {err}", parent.display()),
			})?;
		}

		let staging = self.staging_path();

		fs::write(&staging, payload).map_err(|err| Error::Storage {
			message: format!("Failed to write {}: {err}", staging.display()),
		})?;
		fs::rename(&staging, &self.path).map_err(|err| Error::Storage {
			message: format!("Failed to replace {}: {err}", self.path.display()),
		})?;

		Ok(())
	}

	fn staging_path(&self) -> PathBuf {
		let mut name = self.path.file_name().map(|name| name.to_os_string()).unwrap_or_default();

		name.push(".tmp");

		self.path.with_file_name(name)
	}
}
