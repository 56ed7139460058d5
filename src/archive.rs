use std::fs::File ;
use std::io::Read ;
use std::path::{ Path, PathBuf };
use thiserror::Error ;
use zip::ZipArchive ;
use zip::result::ZipError ;

use crate::plugin_loader::LoadError ;



#[derive( Error, Debug )]
pub enum ArchiveError {
	#[error( "IO error: {0}" )] Io( #[from] std::io::Error ),
	#[error( "Zip error: {0}" )] Zip( #[from] ZipError ),
}

/// Read handle on a single plugin archive.
///
/// Only entries of this one archive are visible through the handle. The
/// underlying file is closed when the handle is dropped.
pub(crate) struct PluginArchive {
	path: PathBuf,
	zip: ZipArchive<File>,
}

impl PluginArchive {

	pub(crate) fn open( path: &Path ) -> Result<Self, ArchiveError> {
		let zip = ZipArchive::new( File::open( path )?)?;
		Ok( Self { path: path.to_path_buf(), zip })
	}

	#[inline] pub(crate) fn path( &self ) -> &Path { &self.path }

	pub(crate) fn contains( &self, entry: &str ) -> bool {
		self.zip.file_names().any(| name | name == entry )
	}

	/// Reads `entry` in full, `None` if the archive has no such entry.
	pub(crate) fn read_entry( &mut self, entry: &str ) -> Result<Option<Vec<u8>>, ArchiveError> {
		let mut file = match self.zip.by_name( entry ) {
			Ok( file ) => file,
			Err( ZipError::FileNotFound ) => return Ok( None ),
			Err( err ) => return Err( err.into() ),
		};
		let mut buffer = Vec::with_capacity( usize::try_from( file.size() ).unwrap_or( 0 ));
		file.read_to_end( &mut buffer )?;
		Ok( Some( buffer ))
	}

}

/// Fails unless `path` is an existing directory.
pub(crate) fn check_directory( path: &Path ) -> Result<(), LoadError> {
	if !path.exists() { return Err( LoadError::InvalidPath( path.to_path_buf() )) }
	if !path.is_dir() { return Err( LoadError::NotADirectory( path.to_path_buf() )) }
	Ok(())
}

/// Lists the files directly inside `directory` whose name ends with `suffix`.
///
/// The match is case-sensitive and subdirectories are not descended into.
/// Paths are returned sorted so the resulting search path is stable.
pub(crate) fn scan_archives( directory: &Path, suffix: &str ) -> Result<Vec<PathBuf>, LoadError> {

	check_directory( directory )?;

	let unreadable = | source | LoadError::UnreadableDirectory { path: directory.to_path_buf(), source };
	let mut archives = std::fs::read_dir( directory )
		.map_err( unreadable )?
		.filter_map(| entry | match entry {
			Ok( entry ) => Some( entry.path() ),
			Err( err ) => {
				tracing::warn!( directory = %directory.display(), error = %err, "Skipping unreadable directory entry" );
				None
			}
		})
		.filter(| path | path.is_file() )
		.filter(| path | path.file_name().is_some_and(| name | name.to_string_lossy().ends_with( suffix )))
		.collect::<Vec<_>>();
	archives.sort();

	tracing::debug!( directory = %directory.display(), count = archives.len(), "Scanned for plugin archives" );
	Ok( archives )

}

#[cfg( test )]
mod tests {

	use super::* ;

	#[test]
	fn scan_is_suffix_exact_and_flat() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::write( dir.path().join( "a.zip" ), b"" ).unwrap();
		std::fs::write( dir.path().join( "b.ZIP" ), b"" ).unwrap();
		std::fs::write( dir.path().join( "c.zip.bak" ), b"" ).unwrap();
		std::fs::create_dir( dir.path().join( "nested.zip" )).unwrap();
		std::fs::write( dir.path().join( "nested.zip" ).join( "d.zip" ), b"" ).unwrap();

		let archives = scan_archives( dir.path(), ".zip" ).unwrap();
		assert_eq!( archives, vec![ dir.path().join( "a.zip" )]);
	}

	#[test]
	fn scan_rejects_missing_and_file_paths() {
		let dir = tempfile::tempdir().unwrap();
		let file = dir.path().join( "plugins.zip" );
		std::fs::write( &file, b"" ).unwrap();

		assert!( matches!( scan_archives( &dir.path().join( "missing" ), ".zip" ), Err( LoadError::InvalidPath( _ ))));
		assert!( matches!( scan_archives( &file, ".zip" ), Err( LoadError::NotADirectory( _ ))));
	}

}
