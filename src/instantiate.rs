use std::panic::{ catch_unwind, AssertUnwindSafe };
use thiserror::Error ;

use crate::loader::{ Loader, ResolveError };
use crate::module::LoadedModule ;
use crate::registry::{ ConstructionError, Definition, Instance };



/// A module type could not be turned into a [`LoadedModule`].
#[derive( Error, Debug )]
pub enum InstantiationError {
	#[error( "Module type {type_name} could not be resolved: {source}" )]
	NotFound { type_name: String, source: ResolveError },
	#[error( "Module type {0} cannot be default-constructed" )]
	NotConstructible( String ),
	#[error( "Unable to instantiate module {type_name}: {source}" )]
	ConstructionFailed { type_name: String, source: ConstructionError },
	#[error( "Unable to use {type_name} as a module, its factory produced a {found}" )]
	NotAModule { type_name: String, found: &'static str },
}

/// Resolves `type_name` through `loader` and default-constructs it.
///
/// # Errors
/// Fails if the type is not on the loader's search space, has no factory, its
/// factory fails or panics, or the constructed value is not a module.
pub fn instantiate( type_name: &str, loader: &mut dyn Loader ) -> Result<LoadedModule, InstantiationError> {

	let factory = match loader.resolve( type_name ) {
		Ok( Definition::Constructible( factory )) => factory,
		Ok( Definition::Abstract ) => return Err( InstantiationError::NotConstructible( type_name.to_string() )),
		Err( source ) => return Err( InstantiationError::NotFound { type_name: type_name.to_string(), source }),
	};

	let constructed = catch_unwind( AssertUnwindSafe(|| factory() ))
		.unwrap_or_else(| payload | Err( ConstructionError::Panicked( panic_message( payload.as_ref() ))));

	match constructed {
		Ok( Instance::Module( module )) => Ok( module ),
		Ok( Instance::Other( found )) => Err( InstantiationError::NotAModule { type_name: type_name.to_string(), found }),
		Err( source ) => Err( InstantiationError::ConstructionFailed { type_name: type_name.to_string(), source }),
	}

}

fn panic_message( payload: &( dyn std::any::Any + Send )) -> String {
	payload.downcast_ref::<&str>().map( ToString::to_string )
		.or_else(|| payload.downcast_ref::<String>().cloned() )
		.unwrap_or_else(|| "<non-string panic payload>".to_string() )
}

#[cfg( test )]
mod tests {

	use std::sync::Arc ;
	use super::* ;
	use crate::container::{ Binder, Container };
	use crate::loader::ModuleLoader ;
	use crate::module::{ ChildModule, Module };
	use crate::registry::ModuleRegistry ;

	#[derive( Default )]
	struct Plain ;
	impl Module for Plain { fn configure( &self, _binder: &mut Binder ) {} }

	#[derive( Default )]
	struct Child ;
	impl Module for Child { fn configure( &self, _binder: &mut Binder ) {} }
	impl ChildModule for Child { fn before_child_scope( &self, _parent: &Container ) {} }

	fn loader() -> ModuleLoader {
		let registry = ModuleRegistry::new()
			.with_module::<Plain>( "t::Plain" )
			.with_child_module::<Child>( "t::Child" )
			.with_type::<Vec<u8>>( "t::Bytes" )
			.with_abstract( "t::Abstract" )
			.with_factory( "t::Failing", || Err( ConstructionError::failed( "no database" )))
			.with_factory( "t::Panicking", || panic!( "constructor exploded" ));
		let registry = [ "t::Plain", "t::Child", "t::Bytes", "t::Abstract", "t::Failing", "t::Panicking" ]
			.into_iter()
			.fold( registry, ModuleRegistry::with_host_visibility );
		ModuleLoader::new( Arc::new( registry ), [] )
	}

	#[test]
	fn capability_is_preserved() {
		let mut loader = loader();
		assert!( !instantiate( "t::Plain", &mut loader ).unwrap().is_child_aware() );
		assert!( instantiate( "t::Child", &mut loader ).unwrap().is_child_aware() );
	}

	#[test]
	fn failures_are_classified() {
		let mut loader = loader();
		assert!( matches!( instantiate( "t::Nope", &mut loader ), Err( InstantiationError::NotFound { .. })));
		assert!( matches!( instantiate( "t::Abstract", &mut loader ), Err( InstantiationError::NotConstructible( _ ))));
		assert!( matches!( instantiate( "t::Bytes", &mut loader ), Err( InstantiationError::NotAModule { .. })));
		assert!( matches!(
			instantiate( "t::Failing", &mut loader ),
			Err( InstantiationError::ConstructionFailed { source: ConstructionError::Failed( _ ), .. }),
		));
		match instantiate( "t::Panicking", &mut loader ) {
			Err( InstantiationError::ConstructionFailed { source: ConstructionError::Panicked( message ), .. }) =>
				assert_eq!( message, "constructor exploded" ),
			other => panic!( "unexpected result: {:?}", other ),
		}
	}

}
