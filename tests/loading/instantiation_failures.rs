use plugin_link::{
	ConstructionError, Container, CompositionError, Instance, InstantiationError,
	LoadWarning, ModuleRegistry, PluginLoader,
};
use crate::plugin_fixtures::{ HookLog, PluginDir, RegistryFixtures };

fn plugins() -> PluginDir {
	let dir = PluginDir::new();
	dir.plugin( "1.zip", "a-missing", "acme::Missing" );
	dir.plugin( "2.zip", "b-abstract", "acme::Abstract" );
	dir.plugin( "3.zip", "c-failing", "acme::Failing" );
	dir.plugin( "4.zip", "d-panicking", "acme::Panicking" );
	dir.plugin( "5.zip", "e-not-a-module", "acme::Settings" );
	dir.plugin( "6.zip", "f-working", "acme::Working" );
	dir
}

fn registry( log: &HookLog ) -> ModuleRegistry {
	ModuleRegistry::new()
		.with_abstract( "acme::Abstract" )
		.with_failing( "acme::Failing" )
		.with_factory( "acme::Panicking", || panic!( "fixture constructor panicked" ))
		.with_factory( "acme::Settings", || Ok( Instance::Other( "acme::Settings" )))
		.with_layer( "acme::Working", log )
}

#[test]
fn instantiation_failures_are_skipped() {

	let dir = plugins();
	let log = HookLog::default();

	let ( modules, warnings ) = PluginLoader::new( registry( &log )).load_modules( dir.path(), None ).unwrap();

	assert_eq!( modules.iter().map(| module | module.name() ).collect::<Vec<_>>(), vec![ "acme::Working" ]);
	assert_warnings!( warnings, [
		LoadWarning::Plugin { source: InstantiationError::NotFound { .. }, .. },
		LoadWarning::Plugin { source: InstantiationError::NotConstructible( _ ), .. },
		LoadWarning::Plugin { source: InstantiationError::ConstructionFailed { source: ConstructionError::Failed( _ ), .. }, .. },
		LoadWarning::Plugin { source: InstantiationError::ConstructionFailed { source: ConstructionError::Panicked( _ ), .. }, .. },
		LoadWarning::Plugin { source: InstantiationError::NotAModule { found: "acme::Settings", .. }, .. },
	]);

	let plugins = warnings.iter().filter_map(| warning | match warning {
		LoadWarning::Plugin { plugin, .. } => Some( plugin.as_str() ),
		_ => None,
	}).collect::<Vec<_>>();
	assert_eq!( plugins, vec![ "a-missing", "b-abstract", "c-failing", "d-panicking", "e-not-a-module" ]);

}

#[test]
fn instantiation_failures_do_not_block_composition() {

	let dir = plugins();
	dir.plugin( "7.zip", "g-legacy", "acme::Legacy" );
	let log = HookLog::default();

	let ( container, warnings ) = PluginLoader::new( registry( &log ).with_legacy( "acme::Legacy" ))
		.load_plugins( Container::empty(), dir.path(), None )
		.unwrap();

	assert_eq!( container.depth(), 1 );
	assert_eq!( container.module_names(), vec![ "acme::Working" ]);
	assert_eq!( warnings.len(), 6 );
	assert!( matches!(
		warnings.last(),
		Some( LoadWarning::Composition( CompositionError::NotChildAware( name ))) if name == "acme::Legacy",
	));

}
