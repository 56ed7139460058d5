use plugin_link::{ DescriptorParseError, DiscoveryError, LoadWarning, ModuleRegistry, PluginDescriptor, PluginLoader };
use crate::plugin_fixtures::{ HookLog, PluginDir, RegistryFixtures, METADATA_PATH };

#[test]
fn malformed_metadata_is_warned() {

	let dir = PluginDir::new();
	dir.archive( "a-broken.zip", &[( METADATA_PATH, b"name = [ unterminated" )]);
	dir.plugin( "b-greeter.zip", "greeter", "acme::Greeter" );

	let ( descriptors, warnings ) = PluginLoader::new( ModuleRegistry::new() ).discover( dir.path() ).unwrap();

	assert_warnings!( warnings, [
		LoadWarning::Discovery( DiscoveryError::MalformedMetadata { source: DescriptorParseError::Toml( _ ), .. }),
	]);
	assert_eq!( descriptors.into_iter().collect::<Vec<_>>(), vec![ PluginDescriptor::new( "greeter", "acme::Greeter" )]);

}

#[test]
fn malformed_metadata_blank_module() {

	let dir = PluginDir::new();
	dir.archive( "blank.zip", &[( METADATA_PATH, b"name = \"blank\"\nmodule = \"\"\n" )]);

	let ( descriptors, warnings ) = PluginLoader::new( ModuleRegistry::new() ).discover( dir.path() ).unwrap();

	assert_warnings!( warnings, [
		LoadWarning::Discovery( DiscoveryError::MalformedMetadata { source: DescriptorParseError::EmptyField( "module" ), .. }),
	]);
	assert!( descriptors.is_empty() );

}

#[test]
fn malformed_metadata_unreadable_archive() {

	let dir = PluginDir::new();
	let corrupt = dir.file( "a-corrupt.zip", b"this is not a zip archive" );
	dir.plugin( "b-greeter.zip", "greeter", "acme::Greeter" );

	let ( descriptors, warnings ) = PluginLoader::new( ModuleRegistry::new() ).discover( dir.path() ).unwrap();

	assert_warnings!( warnings, [ LoadWarning::Discovery( DiscoveryError::UnreadableArchive { .. }) ]);
	match &warnings[ 0 ] {
		LoadWarning::Discovery( DiscoveryError::UnreadableArchive { archive, .. }) => assert_eq!( archive, &corrupt ),
		other => panic!( "Unexpected warning: {:?}", other ),
	}
	assert_eq!( descriptors.len(), 1 );

}

#[test]
fn malformed_metadata_excludes_module() {

	let dir = PluginDir::new();
	dir.archive( "a-broken.zip", &[
		( METADATA_PATH, b"module = \"acme::Broken\"\n" ),
		( "acme/Broken.module", b"" ),
	]);
	dir.plugin( "b-greeter.zip", "greeter", "acme::Greeter" );

	let log = HookLog::default();
	let registry = ModuleRegistry::new()
		.with_layer( "acme::Broken", &log )
		.with_layer( "acme::Greeter", &log );

	let ( modules, warnings ) = PluginLoader::new( registry ).load_modules( dir.path(), None ).unwrap();

	assert_warnings!( warnings, [ LoadWarning::Discovery( DiscoveryError::MalformedMetadata { .. }) ]);
	assert_eq!( modules.iter().map(| module | module.name() ).collect::<Vec<_>>(), vec![ "acme::Greeter" ]);

}
