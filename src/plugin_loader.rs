//! Entry points tying discovery, loading and composition together.

use std::collections::BTreeSet ;
use std::path::{ Path, PathBuf };
use std::sync::Arc ;
use itertools::Itertools ;
use pipe_trait::Pipe ;
use thiserror::Error ;

use crate::archive::{ check_directory, scan_archives };
use crate::compose::{ compose, CompositionError };
use crate::config::{ ConfigError, LoaderConfig };
use crate::container::Container ;
use crate::descriptor::{ DescriptorParser, PluginDescriptor, TomlDescriptorParser };
use crate::discovery::{ extract_descriptors, DiscoveryError };
use crate::instantiate::{ instantiate, InstantiationError };
use crate::loader::{ AppendError, Loader, Location, ModuleLoader };
use crate::module::LoadedModule ;
use crate::registry::ModuleRegistry ;
use crate::utils::{ Merge, PartialSuccess };



/// Errors that abort a loading operation.
#[derive( Error, Debug )]
pub enum LoadError {
	#[error( "Path '{}' does not exist", .0.display() )]
	InvalidPath( PathBuf ),
	#[error( "Path '{}' must be a directory", .0.display() )]
	NotADirectory( PathBuf ),
	#[error( "Unable to list directory '{}': {source}", .path.display() )]
	UnreadableDirectory { path: PathBuf, source: std::io::Error },
	#[error( "Unable to add plugin archives to the provided loader: {0}" )]
	LoaderAppend( #[from] AppendError ),
	#[error( "Invalid loader configuration: {0}" )]
	Config( #[from] ConfigError ),
}

/// Something was skipped during a loading operation without aborting it.
#[derive( Error, Debug )]
pub enum LoadWarning {
	#[error( "{0}" )]
	Discovery( #[from] DiscoveryError ),
	#[error( "Plugin {plugin}: {source}" )]
	Plugin { plugin: String, source: InstantiationError },
	#[error( "Loading from '{}': {source}", .root.display() )]
	Explicit { root: PathBuf, source: InstantiationError },
	#[error( "{0}" )]
	Composition( #[from] CompositionError ),
}

/// Loads plugin modules and composes them into a container graph.
///
/// Plugins are zip archives placed directly inside a plugins directory. Each
/// archive carries a metadata resource naming the plugin and its module type,
/// plus an entry for every type it defines (see [`type_entry_path`]( crate::type_entry_path )).
/// Module types are instantiated through the factories of the loader's
/// [`ModuleRegistry`].
///
/// Every operation is best-effort: it returns what it could load together with
/// a [`LoadWarning`] for everything it skipped, and only fails outright on the
/// conditions listed by [`LoadError`].
pub struct PluginLoader {
	registry: Arc<ModuleRegistry>,
	config: LoaderConfig,
	parser: Box<dyn DescriptorParser>,
}

impl PluginLoader {

	/// Creates a loader with the default [`LoaderConfig`] and TOML metadata.
	pub fn new( registry: impl Into<Arc<ModuleRegistry>> ) -> Self {
		Self {
			registry: registry.into(),
			config: LoaderConfig::default(),
			parser: Box::new( TomlDescriptorParser ),
		}
	}

	/// Replaces the whole configuration.
	///
	/// The configuration is validated when an operation runs, not here, so
	/// an invalid one makes every operation fail with [`LoadError::Config`].
	pub fn with_config( mut self, config: LoaderConfig ) -> Self {
		self.config = config ;
		self
	}

	pub fn with_archive_suffix( mut self, suffix: impl Into<String> ) -> Self {
		self.config.archive_suffix = suffix.into();
		self
	}

	pub fn with_metadata_path( mut self, path: impl Into<String> ) -> Self {
		self.config.metadata_path = path.into();
		self
	}

	/// Replaces the metadata parser.
	pub fn with_parser( mut self, parser: impl DescriptorParser + 'static ) -> Self {
		self.parser = Box::new( parser );
		self
	}

	#[inline] pub fn config( &self ) -> &LoaderConfig { &self.config }
	#[inline] pub fn registry( &self ) -> &Arc<ModuleRegistry> { &self.registry }

	/// Collects the descriptors of every plugin archive in `plugins_dir`.
	///
	/// # Errors
	/// Fails if the configuration is invalid, or if `plugins_dir` does not exist,
	/// is not a directory or cannot be listed.
	pub fn discover( &self, plugins_dir: &Path ) -> Result<PartialSuccess<BTreeSet<PluginDescriptor>, LoadWarning>, LoadError> {
		let archives = self.scan( plugins_dir )?;
		let ( descriptors, errors ) = extract_descriptors( &archives, &self.config.metadata_path, self.parser.as_ref() );
		Ok(( descriptors, Vec::<LoadWarning>::new().merge_all( errors )))
	}

	/// Instantiates the module of every plugin archive in `plugins_dir`.
	///
	/// Without a `loader`, a new [`ModuleLoader`] searching exactly the discovered
	/// archives is used. With one, the archives are appended to its search path
	/// first, so types it resolved earlier stay valid.
	///
	/// Modules are returned in descriptor order.
	///
	/// # Errors
	/// Fails if the configuration is invalid, if `plugins_dir` does not exist, is
	/// not a directory or cannot be listed, or if the given `loader` cannot be extended.
	pub fn load_modules(
		&self,
		plugins_dir: &Path,
		loader: Option<&mut dyn Loader>,
	) -> Result<PartialSuccess<Vec<LoadedModule>, LoadWarning>, LoadError> {

		let archives = self.scan( plugins_dir )?;
		let locations = archives.iter().cloned().map( Location::Archive ).collect::<Vec<_>>();

		let mut owned ;
		let loader: &mut dyn Loader = match loader {
			Some( loader ) => {
				loader.append( locations )?;
				loader
			},
			None => {
				owned = ModuleLoader::new( Arc::clone( &self.registry ), locations );
				&mut owned
			},
		};

		let ( descriptors, discovery_errors ) = extract_descriptors( &archives, &self.config.metadata_path, self.parser.as_ref() );

		let ( modules, instantiation_errors ) = descriptors.iter()
			.map(| descriptor | instantiate_plugin( descriptor, &mut *loader ))
			.partition_result::<Vec<_>, Vec<_>, _, _>();

		Ok(( modules, Vec::<LoadWarning>::new().merge_all( discovery_errors ).merge_all( instantiation_errors )))

	}

	/// Loads the plugins in `plugins_dir` and layers their modules on top of `base`.
	///
	/// See [`load_modules`]( Self::load_modules ) for how modules are loaded and
	/// [`compose`]( crate::compose ) for how they are layered.
	///
	/// # Errors
	/// Fails under the same conditions as [`load_modules`]( Self::load_modules ).
	pub fn load_plugins(
		&self,
		base: Container,
		plugins_dir: &Path,
		loader: Option<&mut dyn Loader>,
	) -> Result<PartialSuccess<Container, LoadWarning>, LoadError> {
		let ( modules, warnings ) = self.load_modules( plugins_dir, loader )?;
		compose( base, modules )
			.pipe(|( container, errors )| ( container, warnings.merge_all( errors )))
			.pipe( Ok )
	}

	fn scan( &self, plugins_dir: &Path ) -> Result<Vec<PathBuf>, LoadError> {
		self.config.validate()?;
		scan_archives( plugins_dir, &self.config.archive_suffix )
	}

	/// Instantiates the named module types, in order, from a classpath root directory.
	///
	/// No metadata is read and nothing is composed. Every name is attempted, so
	/// repeated names yield one module per successful attempt.
	///
	/// # Errors
	/// Fails if `classpath_root` does not exist or is not a directory.
	pub fn load_modules_by_type_names(
		&self,
		classpath_root: &Path,
		type_names: impl IntoIterator<Item = impl AsRef<str>>,
	) -> Result<PartialSuccess<Vec<LoadedModule>, LoadWarning>, LoadError> {

		check_directory( classpath_root )?;
		let mut loader = ModuleLoader::new( Arc::clone( &self.registry ), [ Location::Directory( classpath_root.to_path_buf() )]);

		Ok( type_names.into_iter()
			.map(| type_name | {
				let type_name = type_name.as_ref();
				instantiate( type_name, &mut loader )
					.inspect(| _ | tracing::info!( module = type_name, "Module has been loaded" ))
					.map_err(| source | {
						tracing::warn!( module = type_name, root = %classpath_root.display(), error = %source, "Unable to load module" );
						LoadWarning::Explicit { root: classpath_root.to_path_buf(), source }
					})
			})
			.partition_result())

	}

}

fn instantiate_plugin( descriptor: &PluginDescriptor, loader: &mut dyn Loader ) -> Result<LoadedModule, LoadWarning> {
	match instantiate( descriptor.module(), loader ) {
		Ok( module ) => {
			tracing::info!( plugin = descriptor.name(), module = descriptor.module(), "Plugin has been loaded" );
			Ok( module )
		},
		Err( source ) => {
			tracing::warn!( plugin = descriptor.name(), module = descriptor.module(), error = %source, "Unable to load plugin" );
			Err( LoadWarning::Plugin { plugin: descriptor.name().to_string(), source })
		},
	}
}

impl std::fmt::Debug for PluginLoader {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "PluginLoader" )
			.field( "registry", &self.registry )
			.field( "config", &self.config )
			.field( "parser", &"<DescriptorParser>" )
			.finish()
	}
}

#[cfg( test )]
mod tests {

	use super::* ;

	#[test]
	fn loader_is_shareable_across_threads() {
		fn assert_send_sync<T: Send + Sync>() {}
		assert_send_sync::<PluginLoader>();
		assert_send_sync::<LoaderConfig>();
	}

	#[test]
	fn invalid_config_is_reported_before_scanning() {
		let loader = PluginLoader::new( ModuleRegistry::new() ).with_metadata_path( "" );
		let missing = Path::new( "definitely/not/here" );
		assert!( matches!( loader.discover( missing ), Err( LoadError::Config( ConfigError::EmptyMetadataPath ))));
		assert!( matches!( loader.load_modules( missing, None ), Err( LoadError::Config( ConfigError::EmptyMetadataPath ))));
	}

}
