use plugin_link::{ CompositionError, Container, LoadWarning, ModuleRegistry, PluginLoader };
use crate::plugin_fixtures::{ contribution, HookLog, PluginDir, RegistryFixtures };

#[test]
fn load_plugins_empty_directory_returns_base() {

	let dir = PluginDir::new();
	let base = Container::empty();

	let ( graph, warnings ) = PluginLoader::new( ModuleRegistry::new() ).load_plugins( base.clone(), dir.path(), None ).unwrap();
	assert_no_warnings!( warnings );
	assert!( Container::ptr_eq( &graph, &base ));

}

#[test]
fn load_plugins_warns_old_plugins() {

	let dir = PluginDir::new();
	dir.plugin( "a.zip", "current", "acme::Current" );
	dir.plugin( "b.zip", "legacy", "acme::Legacy" );

	let registry = ModuleRegistry::new()
		.with_layer( "acme::Current", &HookLog::default() )
		.with_legacy( "acme::Legacy" );

	let ( graph, warnings ) = PluginLoader::new( registry ).load_plugins( Container::empty(), dir.path(), None ).unwrap();

	assert_warnings!( warnings, [ LoadWarning::Composition( CompositionError::NotChildAware( _ )) ]);
	assert!( warnings[ 0 ].to_string().starts_with( "Old plugin!" ));
	assert_eq!( graph.depth(), 1 );
	assert_eq!( contribution( &graph, "acme::Current" ).as_deref(), Some( "acme::Current" ));
	assert_eq!( contribution( &graph, "acme::Legacy" ), None );

}
