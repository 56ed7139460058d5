//! Layered dependency-injection scopes.
//!
//! A [`Container`] is a handle on an immutable scope. Every scope except the
//! root has exactly one parent, so the scopes reachable from any handle form a
//! strict linear chain. Lookups check the scope itself first, then walk up
//! through its ancestors.

use std::any::{ Any, TypeId };
use std::collections::HashMap ;
use std::sync::Arc ;
use itertools::Itertools ;
use nonempty_collections::NEVec ;
use thiserror::Error ;

use crate::module::LoadedModule ;



type Instance = Arc<dyn Any + Send + Sync> ;

/// Identifies a binding by its type and an optional name.
#[derive( Debug, Clone, PartialEq, Eq, Hash )]
pub struct Key {
	type_id: TypeId,
	type_name: &'static str,
	name: Option<String>,
}

impl Key {

	/// Key for an unnamed binding of `T`.
	pub fn of<T: Any>() -> Self {
		Self { type_id: TypeId::of::<T>(), type_name: std::any::type_name::<T>(), name: None }
	}

	/// Key for a binding of `T` qualified by `name`.
	pub fn named<T: Any>( name: impl Into<String> ) -> Self {
		Self { name: Some( name.into() ), ..Self::of::<T>() }
	}

	#[inline] pub fn type_name( &self ) -> &'static str { self.type_name }
	#[inline] pub fn name( &self ) -> Option<&str> { self.name.as_deref() }

}

impl std::fmt::Display for Key {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result {
		match &self.name {
			Some( name ) => write!( f, "{} named \"{}\"", self.type_name, name ),
			None => write!( f, "{}", self.type_name ),
		}
	}
}

/// Errors detected while collecting the bindings of a single scope.
#[derive( Error, Debug, Clone, PartialEq, Eq )]
pub enum BindingError {
	/// The same key was bound more than once while configuring one scope.
	#[error( "{0} is bound more than once" )] Duplicate( Key ),
	/// The key is already bound by an ancestor; child scopes may not rebind it.
	#[error( "{key} is already bound by the ancestor scope at depth {depth}" )]
	BoundInAncestor { key: Key, depth: usize },
}

/// A scope could not be created because its modules produced conflicting bindings.
#[derive( Error, Debug )]
#[error( "Unable to create scope: {}", .errors.iter().join( "; " ))]
pub struct CreationError {
	pub errors: Vec<BindingError>,
}

/// Collects the bindings contributed by modules while a scope is being built.
pub struct Binder {
	bindings: HashMap<Key, Instance>,
	errors: Vec<BindingError>,
}

impl Binder {

	fn new() -> Self { Self { bindings: HashMap::new(), errors: Vec::with_capacity( 0 ) }}

	/// Binds `value` as the instance served for `T`.
	pub fn bind<T: Any + Send + Sync>( &mut self, value: T ) -> &mut Self {
		self.insert( Key::of::<T>(), Arc::new( value ))
	}

	/// Binds `value` as the instance served for `T` under `name`.
	pub fn bind_named<T: Any + Send + Sync>( &mut self, name: impl Into<String>, value: T ) -> &mut Self {
		self.insert( Key::named::<T>( name ), Arc::new( value ))
	}

	fn insert( &mut self, key: Key, value: Instance ) -> &mut Self {
		if self.bindings.contains_key( &key ) { self.errors.push( BindingError::Duplicate( key )); }
		else { self.bindings.insert( key, value ); }
		self
	}

}

struct Scope {
	parent: Option<Container>,
	depth: usize,
	bindings: HashMap<Key, Instance>,
	modules: Vec<LoadedModule>,
}

/// A handle on one scope of a layered container graph.
///
/// Cloning the handle is cheap and refers to the same scope.
#[derive( Clone )]
pub struct Container( Arc<Scope> );

impl Container {

	/// Creates a root scope from the given modules.
	///
	/// # Errors
	/// Returns a [`CreationError`] if the modules bind the same key more than once.
	pub fn new( modules: impl IntoIterator<Item = LoadedModule> ) -> Result<Self, CreationError> {
		Self::build( None, modules.into_iter().collect())
	}

	/// Creates a root scope without any bindings.
	pub fn empty() -> Self {
		Self( Arc::new( Scope { parent: None, depth: 0, bindings: HashMap::with_capacity( 0 ), modules: Vec::with_capacity( 0 ) }))
	}

	/// Layers `module` on top of this scope, producing a child scope.
	///
	/// # Errors
	/// Returns a [`CreationError`] if the module binds a key twice or rebinds a key
	/// already bound by this scope or one of its ancestors.
	pub fn create_child( &self, module: LoadedModule ) -> Result<Self, CreationError> {
		Self::build( Some( self.clone() ), vec![ module ])
	}

	fn build( parent: Option<Container>, modules: Vec<LoadedModule> ) -> Result<Self, CreationError> {

		let mut binder = Binder::new();
		modules.iter().for_each(| module | module.configure( &mut binder ));
		let Binder { bindings, mut errors } = binder ;

		if let Some( parent ) = &parent {
			errors.extend( bindings.keys()
				.filter_map(| key | parent.depth_of( key ).map(| depth | BindingError::BoundInAncestor { key: key.clone(), depth }))
			);
		}
		if !errors.is_empty() { return Err( CreationError { errors }) }

		let depth = parent.as_ref().map_or( 0, | parent | parent.depth() + 1 );
		Ok( Self( Arc::new( Scope { parent, depth, bindings, modules })))

	}

	/// Resolves the unnamed binding of `T`, searching this scope first, then its ancestors.
	pub fn get<T: Any + Send + Sync>( &self ) -> Option<Arc<T>> { self.lookup( &Key::of::<T>() )}

	/// Resolves the binding of `T` named `name`, searching this scope first, then its ancestors.
	pub fn get_named<T: Any + Send + Sync>( &self, name: &str ) -> Option<Arc<T>> { self.lookup( &Key::named::<T>( name ))}

	/// Whether an unnamed binding of `T` is visible from this scope.
	pub fn contains<T: Any>( &self ) -> bool { self.depth_of( &Key::of::<T>() ).is_some() }

	fn lookup<T: Any + Send + Sync>( &self, key: &Key ) -> Option<Arc<T>> {
		self.ancestors()
			.find_map(| scope | scope.0.bindings.get( key ))
			.and_then(| instance | Arc::clone( instance ).downcast::<T>().ok())
	}

	fn depth_of( &self, key: &Key ) -> Option<usize> {
		self.ancestors().find(| scope | scope.0.bindings.contains_key( key )).map( Container::depth )
	}

	/// The scope this one was layered on, if any.
	#[inline] pub fn parent( &self ) -> Option<&Container> { self.0.parent.as_ref() }

	/// Number of scopes between this one and the root. The root has depth 0.
	#[inline] pub fn depth( &self ) -> usize { self.0.depth }

	/// Iterates over this scope followed by each of its ancestors, ending at the root.
	pub fn ancestors( &self ) -> impl Iterator<Item = &Container> {
		std::iter::successors( Some( self ), | scope | ( *scope ).parent())
	}

	/// This scope followed by each of its ancestors, ending at the root.
	pub fn lineage( &self ) -> NEVec<Container> {
		self.ancestors().skip( 1 ).fold( NEVec::new( self.clone() ), | mut lineage, scope | {
			lineage.push( scope.clone() );
			lineage
		})
	}

	/// Names of the modules configuring this scope (not its ancestors).
	pub fn module_names( &self ) -> Vec<&str> {
		self.0.modules.iter().map( LoadedModule::name ).collect()
	}

	/// Whether both handles refer to the same scope.
	#[inline] pub fn ptr_eq( a: &Container, b: &Container ) -> bool { Arc::ptr_eq( &a.0, &b.0 )}

}

impl std::fmt::Debug for Container {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Container" )
			.field( "depth", &self.0.depth )
			.field( "modules", &self.module_names() )
			.field( "bindings", &self.0.bindings.keys().map( ToString::to_string ).sorted().collect::<Vec<_>>() )
			.finish_non_exhaustive()
	}
}

#[cfg( test )]
mod tests {

	use super::* ;
	use crate::module::{ ChildModule, Module };

	#[derive( Debug, PartialEq )]
	struct Port( u16 );

	struct PortModule( u16 );
	impl Module for PortModule {
		fn configure( &self, binder: &mut Binder ) { binder.bind( Port( self.0 )); }
	}
	impl ChildModule for PortModule {
		fn before_child_scope( &self, _parent: &Container ) {}
	}

	struct NamedModule ;
	impl Module for NamedModule {
		fn configure( &self, binder: &mut Binder ) {
			binder.bind_named( "admin", Port( 9090 )).bind_named( "public", Port( 80 ));
		}
	}
	impl ChildModule for NamedModule {
		fn before_child_scope( &self, _parent: &Container ) {}
	}

	struct TwicePort ;
	impl Module for TwicePort {
		fn configure( &self, binder: &mut Binder ) { binder.bind( Port( 1 )).bind( Port( 2 )); }
	}

	#[test]
	fn child_resolves_from_ancestors() {
		let root = Container::new([ LoadedModule::plain( PortModule( 8080 ))]).unwrap();
		let child = root.create_child( LoadedModule::child_aware( NamedModule )).unwrap();
		assert_eq!( *child.get::<Port>().unwrap(), Port( 8080 ));
		assert_eq!( *child.get_named::<Port>( "admin" ).unwrap(), Port( 9090 ));
		assert!( root.get_named::<Port>( "admin" ).is_none() );
		assert_eq!( child.depth(), 1 );
		assert!( Container::ptr_eq( child.parent().unwrap(), &root ));
	}

	#[test]
	fn child_cannot_rebind_ancestor_key() {
		let root = Container::new([ LoadedModule::plain( PortModule( 8080 ))]).unwrap();
		let err = root.create_child( LoadedModule::child_aware( PortModule( 1 ))).unwrap_err();
		assert_eq!( err.errors, vec![ BindingError::BoundInAncestor { key: Key::of::<Port>(), depth: 0 }]);
	}

	#[test]
	fn duplicate_binding_in_one_scope_is_rejected() {
		let err = Container::new([ LoadedModule::plain( TwicePort )]).unwrap_err();
		assert_eq!( err.errors, vec![ BindingError::Duplicate( Key::of::<Port>() )]);
	}

	#[test]
	fn lineage_runs_from_scope_to_root() {
		let root = Container::empty();
		let middle = root.create_child( LoadedModule::child_aware( PortModule( 1 ))).unwrap();
		let leaf = middle.create_child( LoadedModule::child_aware( NamedModule )).unwrap();
		let lineage = leaf.lineage();
		assert!( Container::ptr_eq( lineage.first(), &leaf ));
		assert!( Container::ptr_eq( lineage.last(), &root ));
		assert_eq!( leaf.ancestors().count(), 3 );
	}

}
