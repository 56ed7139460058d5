//! Type definitions the loaders resolve module names against.
//!
//! Plugin code is linked into the host ahead of time; a [`ModuleRegistry`]
//! maps each module type name to the factory that constructs it. Whether a
//! name is actually resolvable during a loading pass is decided by the
//! [`Loader`]( crate::Loader ) and its search path, not by the registry alone.

use std::collections::{ HashMap, HashSet };
use std::sync::Arc ;
use thiserror::Error ;

use crate::module::{ ChildModule, LoadedModule, Module };



/// Builds a fresh instance every time it is called.
pub type ModuleFactory = Arc<dyn Fn() -> Result<Instance, ConstructionError> + Send + Sync> ;

/// What a [`ModuleFactory`] produced.
pub enum Instance {
	/// A module, tagged with its capability.
	Module( LoadedModule ),
	/// A value of the named type that is not a module.
	Other( &'static str ),
}

impl std::fmt::Debug for Instance {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		match self {
			Self::Module( module ) => f.debug_tuple( "Module" ).field( module ).finish(),
			Self::Other( type_name ) => f.debug_tuple( "Other" ).field( type_name ).finish(),
		}
	}
}

/// A factory failed to produce an instance.
#[derive( Error, Debug )]
pub enum ConstructionError {
	#[error( "{0}" )] Failed( Box<dyn std::error::Error + Send + Sync> ),
	#[error( "constructor panicked: {0}" )] Panicked( String ),
}

impl ConstructionError {
	pub fn failed( error: impl Into<Box<dyn std::error::Error + Send + Sync>> ) -> Self { Self::Failed( error.into() )}
}

/// How a registered type name can be turned into an instance.
#[derive( Clone )]
pub enum Definition {
	/// The type has a factory.
	Constructible( ModuleFactory ),
	/// The type is known but cannot be default-constructed.
	Abstract,
}

impl std::fmt::Debug for Definition {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		match self {
			Self::Constructible( _ ) => write!( f, "Constructible(<factory>)" ),
			Self::Abstract => write!( f, "Abstract" ),
		}
	}
}

#[derive( Debug, Clone, Copy )]
pub(crate) struct RegistryEntry<'a> {
	pub(crate) definition: &'a Definition,
	pub(crate) host_visible: bool,
}

/// Maps type names to their [`Definition`]s.
///
/// Names are `::`-separated paths such as `acme::greeter::GreeterModule`.
/// Entries are *packaged* by default: a loader only resolves them when one of
/// the locations on its search path defines the name (see
/// [`type_entry_path`]( crate::type_entry_path )). Entries marked with
/// [`with_host_visibility`]( Self::with_host_visibility ) are resolvable
/// through any loader.
///
/// Registering a name twice replaces the earlier definition. Host visibility
/// is tracked by name, independently of the definition.
///
/// # Example
///
/// ```
/// use plugin_link::{ Binder, ChildModule, Container, Module, ModuleRegistry };
///
/// #[derive( Default )]
/// struct GreeterModule ;
/// impl Module for GreeterModule {
/// 	fn configure( &self, binder: &mut Binder ) { binder.bind( String::from( "hello" )); }
/// }
/// impl ChildModule for GreeterModule {
/// 	fn before_child_scope( &self, _parent: &Container ) {}
/// }
///
/// let registry = ModuleRegistry::new()
/// 	.with_child_module::<GreeterModule>( "acme::greeter::GreeterModule" )
/// 	.with_abstract( "acme::greeter::Greeter" );
/// assert!( registry.contains( "acme::greeter::GreeterModule" ));
/// ```
#[derive( Debug, Clone, Default )]
pub struct ModuleRegistry {
	definitions: HashMap<String, Definition>,
	host_visible: HashSet<String>,
}

impl ModuleRegistry {

	pub fn new() -> Self { Self::default() }

	/// Registers a module supporting only the minimal [`Module`] capability.
	pub fn with_module<M: Module + Default + 'static>( self, type_name: impl Into<String> ) -> Self {
		self.with_factory( type_name, || Ok( Instance::Module( LoadedModule::plain( M::default() ))))
	}

	/// Registers a module supporting the [`ChildModule`] capability.
	pub fn with_child_module<M: ChildModule + Default + 'static>( self, type_name: impl Into<String> ) -> Self {
		self.with_factory( type_name, || Ok( Instance::Module( LoadedModule::child_aware( M::default() ))))
	}

	/// Registers a constructible type that is not a module.
	pub fn with_type<T: Default + 'static>( self, type_name: impl Into<String> ) -> Self {
		self.with_factory( type_name, || {
			drop( T::default() );
			Ok( Instance::Other( std::any::type_name::<T>() ))
		})
	}

	/// Registers a type that exists but cannot be constructed.
	pub fn with_abstract( self, type_name: impl Into<String> ) -> Self {
		self.with_definition( type_name, Definition::Abstract )
	}

	/// Registers a custom factory.
	pub fn with_factory(
		self,
		type_name: impl Into<String>,
		factory: impl Fn() -> Result<Instance, ConstructionError> + Send + Sync + 'static,
	) -> Self {
		self.with_definition( type_name, Definition::Constructible( Arc::new( factory )))
	}

	fn with_definition( mut self, type_name: impl Into<String>, definition: Definition ) -> Self {
		self.definitions.insert( type_name.into(), definition );
		self
	}

	/// Makes a type resolvable without any location defining it.
	///
	/// The mark applies whether the type is registered before or after this call,
	/// and survives re-registration.
	pub fn with_host_visibility( mut self, type_name: impl Into<String> ) -> Self {
		self.host_visible.insert( type_name.into() );
		self
	}

	#[inline] pub fn contains( &self, type_name: &str ) -> bool { self.definitions.contains_key( type_name )}
	#[inline] pub fn is_host_visible( &self, type_name: &str ) -> bool { self.host_visible.contains( type_name )}
	#[inline] pub fn len( &self ) -> usize { self.definitions.len() }
	#[inline] pub fn is_empty( &self ) -> bool { self.definitions.is_empty() }

	pub(crate) fn entry( &self, type_name: &str ) -> Option<RegistryEntry<'_>> {
		self.definitions.get( type_name ).map(| definition | RegistryEntry {
			definition,
			host_visible: self.is_host_visible( type_name ),
		})
	}

}

#[cfg( test )]
mod tests {

	use super::* ;

	fn other() -> Result<Instance, ConstructionError> { Ok( Instance::Other( "other" )) }

	#[test]
	fn host_visibility_is_order_independent() {
		let registry = ModuleRegistry::new()
			.with_host_visibility( "acme::Early" )
			.with_factory( "acme::Early", other );
		assert!( registry.entry( "acme::Early" ).is_some_and(| entry | entry.host_visible ));
	}

	#[test]
	fn host_visibility_survives_reregistration() {
		let registry = ModuleRegistry::new()
			.with_factory( "acme::Replaced", other )
			.with_host_visibility( "acme::Replaced" )
			.with_abstract( "acme::Replaced" );
		let entry = registry.entry( "acme::Replaced" ).unwrap();
		assert!( entry.host_visible );
		assert!( matches!( entry.definition, Definition::Abstract ));
		assert_eq!( registry.len(), 1 );
	}

	#[test]
	fn unregistered_names_have_no_entry() {
		let registry = ModuleRegistry::new().with_host_visibility( "acme::Ghost" );
		assert!( registry.entry( "acme::Ghost" ).is_none() );
		assert!( registry.is_host_visible( "acme::Ghost" ));
		assert!( registry.is_empty() );
	}

}
