use plugin_link::{ compose, Container, ModuleRegistry, PluginLoader };
use crate::plugin_fixtures::{ chain_modules, layer, legacy, HookCall, HookLog, PluginDir, RegistryFixtures };

fn base() -> Container {
	Container::new([ legacy( "base" )]).unwrap()
}

#[test]
fn sequential_hooks_end_to_end() {

	let dir = PluginDir::new();
	dir.plugin( "a.zip", "a", "acme::A" );
	dir.plugin( "b.zip", "b", "acme::B" );

	let log = HookLog::default();
	let registry = ModuleRegistry::new()
		.with_layer( "acme::A", &log )
		.with_layer( "acme::B", &log );

	let base = base();
	let ( graph, warnings ) = PluginLoader::new( registry ).load_plugins( base.clone(), dir.path(), None ).unwrap();
	assert_no_warnings!( warnings );

	assert_eq!( log.calls(), vec![
		HookCall { module: "acme::A".into(), parent_depth: 0, parent_modules: vec![ "base".into() ]},
		HookCall { module: "acme::B".into(), parent_depth: 1, parent_modules: vec![ "base".into(), "acme::A".into() ]},
	]);

	let lineage = graph.lineage();
	assert_eq!( lineage.len().get(), 3 );
	assert!( Container::ptr_eq( lineage.last(), &base ));
	assert_eq!( chain_modules( &graph ), vec![ "base", "acme::A", "acme::B" ]);

}

#[test]
fn sequential_hooks_see_prior_layers() {

	let log = HookLog::default();
	let base = base();

	let ( graph, warnings ) = compose( base, [ layer( "first", &log ), layer( "second", &log ), layer( "third", &log )]);
	assert_no_warnings!( warnings );

	let depths = log.calls().into_iter().map(| call | call.parent_depth ).collect::<Vec<_>>();
	assert_eq!( depths, vec![ 0, 1, 2 ]);
	assert_eq!( graph.depth(), 3 );
	assert_eq!( graph.module_names(), vec![ "third" ]);
	assert!( graph.parent().is_some_and(| parent | parent.module_names() == vec![ "second" ]));

}
