//! Module capabilities.
//!
//! A module is a unit of configuration that contributes bindings to a
//! [`Container`] scope. Plugins ship one module each; which capability the
//! module carries decides how it is composed:
//!
//! - [`Module`] is the minimal capability. Such modules can seed a root
//! 	container but are skipped by plugin composition.
//! - [`ChildModule`] additionally gets to look at the parent scope right before
//! 	a child scope is layered on top of it.

use crate::container::{ Binder, Container };



/// A unit of configuration for a [`Container`].
pub trait Module: Send + Sync {

	/// Registers this module's bindings.
	fn configure( &self, binder: &mut Binder );

	/// Name used when reporting on this module.
	fn name( &self ) -> &str { std::any::type_name::<Self>() }

}

/// A [`Module`] that can be layered as a child scope on top of an existing container.
///
/// # Example
///
/// ```
/// use plugin_link::{ Binder, ChildModule, Container, LoadedModule, Module };
///
/// struct Port( u16 );
///
/// struct ServerModule ;
/// impl Module for ServerModule {
/// 	fn configure( &self, binder: &mut Binder ) { binder.bind( Port( 8080 )); }
/// }
/// impl ChildModule for ServerModule {
/// 	fn before_child_scope( &self, parent: &Container ) {
/// 		assert!( !parent.contains::<Port>() );
/// 	}
/// }
///
/// let root = Container::empty();
/// let child = root.create_child( LoadedModule::child_aware( ServerModule )).unwrap();
/// assert_eq!( child.get::<Port>().unwrap().0, 8080 );
/// ```
pub trait ChildModule: Module {

	/// Invoked with the current container immediately before this module's
	/// child scope is created on top of it.
	fn before_child_scope( &self, parent: &Container );

}

/// An instantiated module, tagged with the capability it was registered with.
pub enum LoadedModule {
	/// Only supports [`Module`]. Composition skips these.
	Plain( Box<dyn Module> ),
	/// Supports [`ChildModule`].
	ChildAware( Box<dyn ChildModule> ),
}

impl LoadedModule {

	/// Wraps a module that only supports the minimal capability.
	pub fn plain( module: impl Module + 'static ) -> Self { Self::Plain( Box::new( module ))}

	/// Wraps a module that can be layered as a child scope.
	pub fn child_aware( module: impl ChildModule + 'static ) -> Self { Self::ChildAware( Box::new( module ))}

	#[inline] pub fn name( &self ) -> &str { match self {
		Self::Plain( module ) => module.name(),
		Self::ChildAware( module ) => module.name(),
	}}

	#[inline] pub fn is_child_aware( &self ) -> bool { matches!( self, Self::ChildAware( _ ))}

	#[inline] pub(crate) fn configure( &self, binder: &mut Binder ) { match self {
		Self::Plain( module ) => module.configure( binder ),
		Self::ChildAware( module ) => module.configure( binder ),
	}}

}

impl std::fmt::Debug for LoadedModule {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		match self {
			Self::Plain( module ) => f.debug_tuple( "Plain" ).field( &module.name() ).finish(),
			Self::ChildAware( module ) => f.debug_tuple( "ChildAware" ).field( &module.name() ).finish(),
		}
	}
}
