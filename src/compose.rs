use thiserror::Error ;

use crate::container::{ Container, CreationError };
use crate::module::LoadedModule ;
use crate::utils::PartialSuccess ;



/// A module was left out of the composed container graph.
#[derive( Error, Debug )]
pub enum CompositionError {
	/// The module predates child scopes and only supports the plain capability.
	#[error( "Old plugin! Unable to use {0} as a child module" )]
	NotChildAware( String ),
	/// The module's child scope conflicted with the scopes beneath it.
	#[error( "Unable to layer module {module}: {source}" )]
	ScopeCreation { module: String, source: CreationError },
}

/// Layers every child-aware module on top of `base`, one child scope per module.
///
/// Modules are processed in order and each one's
/// [`before_child_scope`]( crate::ChildModule::before_child_scope ) hook sees
/// the container as left by the modules before it. Plain modules are reported
/// and skipped, as are modules whose scope cannot be created; either way the
/// graph is left as it was.
///
/// ```
/// use plugin_link::{ compose, Binder, ChildModule, Container, LoadedModule, Module };
///
/// struct Layer( u8 );
/// impl Module for Layer {
/// 	fn configure( &self, binder: &mut Binder ) { binder.bind_named( self.0.to_string(), self.0 ); }
/// }
/// impl ChildModule for Layer {
/// 	fn before_child_scope( &self, parent: &Container ) { assert_eq!( parent.depth(), usize::from( self.0 )); }
/// }
///
/// let ( graph, errors ) = compose( Container::empty(), [
/// 	LoadedModule::child_aware( Layer( 0 )),
/// 	LoadedModule::child_aware( Layer( 1 )),
/// ]);
/// assert!( errors.is_empty() );
/// assert_eq!( graph.depth(), 2 );
/// ```
pub fn compose(
	base: Container,
	modules: impl IntoIterator<Item = LoadedModule>,
) -> PartialSuccess<Container, CompositionError> {
	modules.into_iter().fold(( base, Vec::new() ), |( current, mut errors ), module | match layer( &current, module ) {
		Ok( next ) => ( next, errors ),
		Err( err ) => {
			tracing::warn!( error = %err, "Module not composed" );
			errors.push( err );
			( current, errors )
		}
	})
}

fn layer( current: &Container, module: LoadedModule ) -> Result<Container, CompositionError> {

	let module = match module {
		LoadedModule::ChildAware( module ) => module,
		LoadedModule::Plain( module ) => return Err( CompositionError::NotChildAware( module.name().to_string() )),
	};

	module.before_child_scope( current );
	let name = module.name().to_string();
	let next = current.create_child( LoadedModule::ChildAware( module ))
		.map_err(| source | CompositionError::ScopeCreation { module: name.clone(), source })?;

	tracing::debug!( module = %name, depth = next.depth(), "Layered child scope" );
	Ok( next )

}
