use plugin_link::{ compose, BindingError, CompositionError, Container };
use crate::plugin_fixtures::{ chain_modules, layer, legacy, HookLog };

#[test]
fn scope_conflicts_leave_graph_unchanged() {

	let log = HookLog::default();

	let ( graph, warnings ) = compose( Container::empty(), [
		layer( "shared", &log ),
		layer( "shared", &log ),
		layer( "other", &log ),
	]);

	assert_warnings!( warnings, [ CompositionError::ScopeCreation { .. } ]);
	match &warnings[ 0 ] {
		CompositionError::ScopeCreation { module, source } => {
			assert_eq!( module, "shared" );
			assert!( matches!( source.errors.as_slice(), [ BindingError::BoundInAncestor { depth: 1, .. }]));
		},
		other => panic!( "Unexpected warning: {:?}", other ),
	}

	assert_eq!( chain_modules( &graph ), vec![ "shared", "other" ]);
	assert_eq!( log.calls().len(), 3 );

}

#[test]
fn scope_conflicts_with_base_bindings() {

	let log = HookLog::default();
	let base = Container::new([ legacy( "taken" )]).unwrap();

	let ( graph, warnings ) = compose( base.clone(), [ layer( "taken", &log )]);

	assert_warnings!( warnings, [ CompositionError::ScopeCreation { .. } ]);
	assert!( Container::ptr_eq( &graph, &base ));

}
