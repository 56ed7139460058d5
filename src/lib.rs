//! Plugin discovery and layered module composition.
//!
//! A plugin is a zip archive dropped into a plugins directory. It carries a
//! small metadata resource naming the plugin and the module type it
//! contributes, plus one entry per type it defines. `plugin_link` finds those
//! archives, instantiates their modules and layers each one as a child scope
//! on top of an existing [`Container`].
//!
//! # Core Concepts
//!
//! - [`Module`]: A unit of configuration contributing bindings to a container scope.
//! 	[`ChildModule`] is the richer capability; only such modules are layered by
//! 	composition, and each gets to inspect the current container right before
//! 	its scope is created.
//!
//! - [`ModuleRegistry`]: Maps module type names to factories. Plugin code is
//! 	linked into the host ahead of time, so the registry is where it is found.
//!
//! - [`Loader`]: Resolves type names within a bounded search space. A type
//! 	registered in the [`ModuleRegistry`] is only visible once a [`Location`] on
//! 	the loader's search path defines it (see [`type_entry_path`]).
//!
//! - [`PluginLoader`]: The entry points. [`discover`]( PluginLoader::discover )
//! 	lists the plugins in a directory, [`load_modules`]( PluginLoader::load_modules )
//! 	instantiates them, [`load_plugins`]( PluginLoader::load_plugins ) also composes
//! 	them, and [`load_modules_by_type_names`]( PluginLoader::load_modules_by_type_names )
//! 	instantiates named types from a classpath root without any metadata.
//!
//! # Error Handling
//!
//! Loading is best-effort. Operations return a [`PartialSuccess`]: whatever
//! could be loaded, plus a [`LoadWarning`] for every archive, plugin or module
//! that was skipped. Warnings are also emitted as `tracing` events. Only the
//! conditions in [`LoadError`] abort an operation.
//!
//! # Example
//!
//! ```
//! use std::io::Write ;
//! use plugin_link::{ Binder, ChildModule, Container, Module, ModuleRegistry, PluginLoader };
//!
//! struct Greeting( &'static str );
//!
//! #[derive( Default )]
//! struct GreeterModule ;
//! impl Module for GreeterModule {
//! 	fn configure( &self, binder: &mut Binder ) { binder.bind( Greeting( "hello" )); }
//! }
//! impl ChildModule for GreeterModule {
//! 	fn before_child_scope( &self, _parent: &Container ) {}
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // A plugin archive naming its module and defining the module's type.
//! let plugins = tempfile::tempdir()?;
//! let mut zip = zip::ZipWriter::new( std::fs::File::create( plugins.path().join( "greeter.zip" ))?);
//! let options = zip::write::SimpleFileOptions::default();
//! zip.start_file( "META-INF/plugin.toml", options )?;
//! zip.write_all( b"name = \"greeter\"\nmodule = \"acme::GreeterModule\"\n" )?;
//! zip.start_file( "acme/GreeterModule.module", options )?;
//! zip.finish()?;
//!
//! let registry = ModuleRegistry::new().with_child_module::<GreeterModule>( "acme::GreeterModule" );
//! let ( container, warnings ) = PluginLoader::new( registry )
//! 	.load_plugins( Container::empty(), plugins.path(), None )?;
//!
//! assert!( warnings.is_empty() );
//! assert_eq!( container.depth(), 1 );
//! assert_eq!( container.get::<Greeting>().unwrap().0, "hello" );
//! # Ok(())
//! # }
//! ```

mod archive ;
mod compose ;
mod config ;
mod container ;
mod descriptor ;
mod discovery ;
mod instantiate ;
mod loader ;
mod module ;
mod plugin_loader ;
mod registry ;
mod utils ;

#[doc( no_inline )]
pub use nonempty_collections::NEVec ;

pub use archive::ArchiveError ;
pub use compose::{ compose, CompositionError };
pub use config::{ LoaderConfig, ConfigError };
pub use container::{ Binder, BindingError, Container, CreationError, Key };
pub use descriptor::{ DescriptorParser, DescriptorParseError, PluginDescriptor, TomlDescriptorParser };
pub use discovery::DiscoveryError ;
pub use instantiate::{ instantiate, InstantiationError };
pub use loader::{ type_entry_path, AppendError, Loader, Location, ModuleLoader, ResolveError, TYPE_ENTRY_EXTENSION };
pub use module::{ ChildModule, LoadedModule, Module };
pub use plugin_loader::{ LoadError, LoadWarning, PluginLoader };
pub use registry::{ ConstructionError, Definition, Instance, ModuleFactory, ModuleRegistry };
pub use utils::PartialSuccess ;
