use std::path::Path ;
use serde::Deserialize ;
use thiserror::Error ;



/// Where plugins are looked for and how they describe themselves.
///
/// Every field has a default, so a configuration file only needs to name the
/// settings it changes:
///
/// ```
/// use plugin_link::LoaderConfig ;
///
/// let config = LoaderConfig::from_toml_str( r#"archive_suffix = ".plugin""# ).unwrap();
/// assert_eq!( config.archive_suffix, ".plugin" );
/// assert_eq!( config.metadata_path, LoaderConfig::default().metadata_path );
/// ```
#[derive( Debug, Clone, PartialEq, Eq, Deserialize )]
#[serde( default, deny_unknown_fields )]
pub struct LoaderConfig {
	/// Case-sensitive file name suffix identifying plugin archives.
	pub archive_suffix: String,
	/// Path of the metadata resource inside each archive.
	pub metadata_path: String,
}

impl LoaderConfig {

	pub const DEFAULT_ARCHIVE_SUFFIX: &'static str = ".zip" ;
	pub const DEFAULT_METADATA_PATH: &'static str = "META-INF/plugin.toml" ;

	/// Parses and validates a TOML configuration.
	///
	/// # Errors
	/// Returns a [`ConfigError`] if the text is not valid TOML or fails validation.
	pub fn from_toml_str( text: &str ) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str( text )?;
		config.validate()?;
		Ok( config )
	}

	/// Reads, parses and validates a TOML configuration file.
	///
	/// # Errors
	/// Returns a [`ConfigError`] if the file cannot be read or its contents are invalid.
	pub fn from_file( path: &Path ) -> Result<Self, ConfigError> {
		Self::from_toml_str( &std::fs::read_to_string( path )?)
	}

	/// # Errors
	/// Returns a [`ConfigError`] describing the first invalid setting.
	pub fn validate( &self ) -> Result<(), ConfigError> {
		if self.archive_suffix.is_empty() { return Err( ConfigError::EmptySuffix ) }
		if self.metadata_path.is_empty() { return Err( ConfigError::EmptyMetadataPath ) }
		if self.metadata_path.starts_with( '/' ) { return Err( ConfigError::AbsoluteMetadataPath( self.metadata_path.clone() )) }
		Ok(())
	}

}

impl Default for LoaderConfig {
	fn default() -> Self {
		Self {
			archive_suffix: Self::DEFAULT_ARCHIVE_SUFFIX.to_string(),
			metadata_path: Self::DEFAULT_METADATA_PATH.to_string(),
		}
	}
}

#[derive( Error, Debug )]
pub enum ConfigError {
	#[error( "IO error: {0}" )] Io( #[from] std::io::Error ),
	#[error( "TOML error: {0}" )] Toml( #[from] toml::de::Error ),
	#[error( "Archive suffix must not be empty" )] EmptySuffix,
	#[error( "Metadata path must not be empty" )] EmptyMetadataPath,
	#[error( "Metadata path '{0}' must be relative to the archive root" )] AbsoluteMetadataPath( String ),
}

#[cfg( test )]
mod tests {

	use super::* ;

	#[test]
	fn empty_document_yields_defaults() {
		assert_eq!( LoaderConfig::from_toml_str( "" ).unwrap(), LoaderConfig::default() );
	}

	#[test]
	fn rejects_invalid_settings() {
		assert!( matches!( LoaderConfig::from_toml_str( "archive_suffix = \"\"" ), Err( ConfigError::EmptySuffix )));
		assert!( matches!( LoaderConfig::from_toml_str( "metadata_path = \"/plugin.toml\"" ), Err( ConfigError::AbsoluteMetadataPath( _ ))));
		assert!( matches!( LoaderConfig::from_toml_str( "suffix = \".jar\"" ), Err( ConfigError::Toml( _ ))));
	}

	#[test]
	fn reads_from_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join( "plugins.toml" );
		std::fs::write( &path, "archive_suffix = \".jar\"\nmetadata_path = \"META-INF/plugin.xml\"\n" ).unwrap();
		let config = LoaderConfig::from_file( &path ).unwrap();
		assert_eq!( config.archive_suffix, ".jar" );
		assert_eq!( config.metadata_path, "META-INF/plugin.xml" );
	}

}
