//! Resolution of module type names.
//!
//! A [`Loader`] resolves type names within a bounded search space: the
//! [`Location`]s on its search path plus the host-visible entries of the
//! registry it delegates to. One loader is shared by every instantiation of a
//! loading pass, so a name resolves to the same [`Definition`] no matter which
//! plugin asks for it.

use std::collections::HashMap ;
use std::path::{ Path, PathBuf };
use std::sync::Arc ;
use itertools::Itertools ;
use thiserror::Error ;

use crate::archive::PluginArchive ;
use crate::registry::{ Definition, ModuleRegistry };



/// File extension of the entries marking a type as defined by a location.
pub const TYPE_ENTRY_EXTENSION: &str = "module" ;

/// Maps a type name to the relative entry path that defines it within a location.
///
/// `acme::greeter::GreeterModule` maps to `acme/greeter/GreeterModule.module`.
/// Returns `None` for names with empty segments or characters other than
/// alphanumerics and `_`.
///
/// ```
/// assert_eq!(
/// 	plugin_link::type_entry_path( "acme::greeter::GreeterModule" ).as_deref(),
/// 	Some( "acme/greeter/GreeterModule.module" ),
/// );
/// assert_eq!( plugin_link::type_entry_path( "acme::::Broken" ), None );
/// ```
pub fn type_entry_path( type_name: &str ) -> Option<String> {
	let segments = type_name.split( "::" ).collect::<Vec<_>>();
	let valid = segments.iter().all(| segment |
		!segment.is_empty() && segment.chars().all(| c | c.is_alphanumeric() || c == '_' )
	);
	valid.then(|| format!( "{}.{}", segments.iter().join( "/" ), TYPE_ENTRY_EXTENSION ))
}

/// One place on a loader's search path.
#[derive( Debug, Clone, PartialEq, Eq, Hash )]
pub enum Location {
	/// A plugin archive; defines the types whose entries it contains.
	Archive( PathBuf ),
	/// A classpath root directory; defines the types whose entry files exist beneath it.
	Directory( PathBuf ),
}

impl Location {

	#[inline] pub fn path( &self ) -> &Path { match self {
		Self::Archive( path ) | Self::Directory( path ) => path,
	}}

	/// Whether this location defines the entry. Unreadable locations define nothing.
	fn defines( &self, entry: &str ) -> bool {
		match self {
			Self::Directory( root ) => root.join( entry ).is_file(),
			Self::Archive( path ) => match PluginArchive::open( path ) {
				Ok( archive ) => archive.contains( entry ),
				Err( err ) => {
					tracing::debug!( archive = %path.display(), error = %err, "Unable to search plugin archive" );
					false
				}
			},
		}
	}

}

/// Name resolution failed.
#[derive( Error, Debug, Clone, PartialEq, Eq )]
pub enum ResolveError {
	#[error( "'{0}' is not a valid type name" )] InvalidTypeName( String ),
	#[error( "Type '{0}' is not found on the search path" )] NotFound( String ),
}

/// A loader's search path could not be extended.
#[derive( Error, Debug, Clone, PartialEq, Eq )]
pub enum AppendError {
	#[error( "Loader does not support appending locations" )] Unsupported,
}

/// Resolves type names to [`Definition`]s within a bounded search space.
pub trait Loader {

	/// Resolves `type_name`.
	///
	/// # Errors
	/// Returns a [`ResolveError`] if the name is malformed or not visible to this loader.
	fn resolve( &mut self, type_name: &str ) -> Result<Definition, ResolveError> ;

	/// The locations this loader searches, in search order.
	fn search_path( &self ) -> &[Location] ;

	/// Appends `locations` to the end of the search path.
	///
	/// Loaders that cannot be extended keep the default implementation.
	///
	/// # Errors
	/// Returns [`AppendError::Unsupported`] unless overridden.
	fn append( &mut self, locations: Vec<Location> ) -> Result<(), AppendError> {
		let _ = locations ;
		Err( AppendError::Unsupported )
	}

}

/// The built-in [`Loader`], backed by a [`ModuleRegistry`].
///
/// Host-visible registry entries resolve first, as through a base loader;
/// every other entry must be defined by a location on the search path.
/// Resolved definitions are cached for the lifetime of the loader.
pub struct ModuleLoader {
	registry: Arc<ModuleRegistry>,
	search_path: Vec<Location>,
	resolved: HashMap<String, Definition>,
	appendable: bool,
}

impl ModuleLoader {

	/// Creates a loader whose search path can later be extended.
	pub fn new( registry: Arc<ModuleRegistry>, locations: impl IntoIterator<Item = Location> ) -> Self {
		Self { registry, search_path: locations.into_iter().collect(), resolved: HashMap::new(), appendable: true }
	}

	/// Creates a loader whose search path is fixed.
	pub fn sealed( registry: Arc<ModuleRegistry>, locations: impl IntoIterator<Item = Location> ) -> Self {
		Self { appendable: false, ..Self::new( registry, locations ) }
	}

}

impl Loader for ModuleLoader {

	fn resolve( &mut self, type_name: &str ) -> Result<Definition, ResolveError> {

		if let Some( definition ) = self.resolved.get( type_name ) { return Ok( definition.clone() ) }

		let entry_path = type_entry_path( type_name )
			.ok_or_else(|| ResolveError::InvalidTypeName( type_name.to_string() ))?;
		let entry = self.registry.entry( type_name )
			.ok_or_else(|| ResolveError::NotFound( type_name.to_string() ))?;

		let visible = entry.host_visible
			|| self.search_path.iter().any(| location | location.defines( &entry_path ));
		if !visible { return Err( ResolveError::NotFound( type_name.to_string() )) }

		let definition = entry.definition.clone();
		self.resolved.insert( type_name.to_string(), definition.clone() );
		Ok( definition )

	}

	#[inline] fn search_path( &self ) -> &[Location] { &self.search_path }

	fn append( &mut self, locations: Vec<Location> ) -> Result<(), AppendError> {
		if !self.appendable { return Err( AppendError::Unsupported ) }
		tracing::debug!( count = locations.len(), "Extending loader search path" );
		self.search_path.extend( locations );
		Ok(())
	}

}

impl std::fmt::Debug for ModuleLoader {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "ModuleLoader" )
			.field( "search_path", &self.search_path )
			.field( "resolved", &self.resolved.keys().sorted().collect::<Vec<_>>() )
			.field( "appendable", &self.appendable )
			.finish_non_exhaustive()
	}
}

#[cfg( test )]
mod tests {

	use super::* ;
	use crate::registry::Instance ;

	fn registry() -> Arc<ModuleRegistry> {
		Arc::new( ModuleRegistry::new()
			.with_factory( "acme::Packaged", || Ok( Instance::Other( "Packaged" )))
			.with_factory( "acme::Host", || Ok( Instance::Other( "Host" )))
			.with_host_visibility( "acme::Host" ))
	}

	#[test]
	fn entry_paths_follow_type_segments() {
		assert_eq!( type_entry_path( "Single" ).as_deref(), Some( "Single.module" ));
		assert_eq!( type_entry_path( "a::b_c::D1" ).as_deref(), Some( "a/b_c/D1.module" ));
		assert_eq!( type_entry_path( "" ), None );
		assert_eq!( type_entry_path( "a.b.C" ), None );
		assert_eq!( type_entry_path( "::Leading" ), None );
	}

	#[test]
	fn host_entries_resolve_without_locations() {
		let mut loader = ModuleLoader::new( registry(), [] );
		assert!( loader.resolve( "acme::Host" ).is_ok() );
		assert_eq!( loader.resolve( "acme::Packaged" ).unwrap_err(), ResolveError::NotFound( "acme::Packaged".into() ));
		assert_eq!( loader.resolve( "acme::Missing" ).unwrap_err(), ResolveError::NotFound( "acme::Missing".into() ));
		assert_eq!( loader.resolve( "acme..Bad" ).unwrap_err(), ResolveError::InvalidTypeName( "acme..Bad".into() ));
	}

	#[test]
	fn directory_locations_define_packaged_entries() {
		let root = tempfile::tempdir().unwrap();
		std::fs::create_dir_all( root.path().join( "acme" )).unwrap();
		std::fs::write( root.path().join( "acme" ).join( "Packaged.module" ), b"" ).unwrap();

		let mut loader = ModuleLoader::new( registry(), [ Location::Directory( root.path().to_path_buf() )]);
		let Definition::Constructible( first ) = loader.resolve( "acme::Packaged" ).unwrap() else { panic!( "expected a factory" ) };
		let Definition::Constructible( second ) = loader.resolve( "acme::Packaged" ).unwrap() else { panic!( "expected a factory" ) };
		assert!( Arc::ptr_eq( &first, &second ));
	}

	#[derive( Clone, Default )]
	struct Captured( Arc<std::sync::Mutex<Vec<u8>>> );

	impl std::io::Write for Captured {
		fn write( &mut self, buf: &[u8] ) -> std::io::Result<usize> {
			self.0.lock().unwrap().extend_from_slice( buf );
			Ok( buf.len() )
		}
		fn flush( &mut self ) -> std::io::Result<()> { Ok(()) }
	}

	#[test]
	fn unreadable_archives_do_not_warn_per_resolution() {
		let dir = tempfile::tempdir().unwrap();
		let corrupt = dir.path().join( "corrupt.zip" );
		std::fs::write( &corrupt, b"not a zip archive" ).unwrap();

		let captured = Captured::default();
		let writer = captured.clone();
		let subscriber = tracing_subscriber::fmt()
			.with_max_level( tracing::Level::WARN )
			.with_ansi( false )
			.with_writer( move || writer.clone() )
			.finish();

		tracing::subscriber::with_default( subscriber, || {
			let mut loader = ModuleLoader::new( registry(), [ Location::Archive( corrupt )]);
			for _ in 0..3 {
				assert_eq!( loader.resolve( "acme::Packaged" ).unwrap_err(), ResolveError::NotFound( "acme::Packaged".into() ));
			}
		});

		assert!( captured.0.lock().unwrap().is_empty() );
	}

	#[test]
	fn sealed_loader_rejects_append() {
		let mut loader = ModuleLoader::sealed( registry(), [] );
		assert_eq!( loader.append( vec![ Location::Directory( PathBuf::from( "." ))]), Err( AppendError::Unsupported ));
		assert!( loader.search_path().is_empty() );
	}

	#[test]
	fn append_extends_search_path_in_order() {
		let mut loader = ModuleLoader::new( registry(), [ Location::Directory( PathBuf::from( "a" ))]);
		loader.append( vec![ Location::Archive( PathBuf::from( "b.zip" ))]).unwrap();
		assert_eq!( loader.search_path(), &[
			Location::Directory( PathBuf::from( "a" )),
			Location::Archive( PathBuf::from( "b.zip" )),
		]);
	}

}
