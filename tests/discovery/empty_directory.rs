use plugin_link::{ ModuleRegistry, PluginLoader };
use crate::plugin_fixtures::{ PluginDir, METADATA_PATH };

#[test]
fn empty_directory_without_files() {

	let dir = PluginDir::new();

	let ( descriptors, warnings ) = PluginLoader::new( ModuleRegistry::new() ).discover( dir.path() ).unwrap();
	assert_no_warnings!( warnings );
	assert!( descriptors.is_empty() );

}

#[test]
fn empty_directory_only_non_archives() {

	let dir = PluginDir::new();
	dir.file( "readme.txt", b"not a plugin" );
	dir.file( "settings.toml", b"name = \"greeter\"\nmodule = \"acme::Greeter\"\n" );
	dir.archive( "upper.ZIP", &[( METADATA_PATH, b"name = \"upper\"\nmodule = \"acme::Upper\"\n" )]);
	dir.archive( "backup.zip.bak", &[( METADATA_PATH, b"name = \"backup\"\nmodule = \"acme::Backup\"\n" )]);

	let ( descriptors, warnings ) = PluginLoader::new( ModuleRegistry::new() ).discover( dir.path() ).unwrap();
	assert_no_warnings!( warnings );
	assert!( descriptors.is_empty() );

}

#[test]
fn empty_directory_nested_archives_are_not_scanned() {

	let dir = PluginDir::new();
	std::fs::create_dir( dir.path().join( "nested" )).unwrap();
	dir.plugin( "nested/greeter.zip", "greeter", "acme::Greeter" );

	let ( descriptors, warnings ) = PluginLoader::new( ModuleRegistry::new() ).discover( dir.path() ).unwrap();
	assert_no_warnings!( warnings );
	assert!( descriptors.is_empty() );

}

#[test]
fn empty_directory_archive_without_metadata() {

	let dir = PluginDir::new();
	dir.archive( "library.zip", &[( "acme/Helper.module", b"" )]);

	let ( descriptors, warnings ) = PluginLoader::new( ModuleRegistry::new() ).discover( dir.path() ).unwrap();
	assert_no_warnings!( warnings );
	assert!( descriptors.is_empty() );

}
