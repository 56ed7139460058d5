use plugin_link::{ ConfigError, Container, DescriptorParseError, LoadError, LoaderConfig, ModuleRegistry, PluginDescriptor, PluginLoader };
use crate::plugin_fixtures::{ PluginDir, METADATA_PATH };

#[test]
fn configured_format_suffix_and_metadata_path() {

	let dir = PluginDir::new();
	dir.archive( "greeter.plugin", &[( "plugin.toml", b"name = \"greeter\"\nmodule = \"acme::Greeter\"\n" )]);
	dir.archive( "ignored.zip", &[( "plugin.toml", b"name = \"ignored\"\nmodule = \"acme::Ignored\"\n" )]);
	dir.archive( "default-path.plugin", &[( METADATA_PATH, b"name = \"hidden\"\nmodule = \"acme::Hidden\"\n" )]);

	let loader = PluginLoader::new( ModuleRegistry::new() )
		.with_archive_suffix( ".plugin" )
		.with_metadata_path( "plugin.toml" );

	let ( descriptors, warnings ) = loader.discover( dir.path() ).unwrap();
	assert_no_warnings!( warnings );
	assert_eq!( descriptors.into_iter().collect::<Vec<_>>(), vec![ PluginDescriptor::new( "greeter", "acme::Greeter" )]);

}

#[test]
fn configured_format_from_config_file() {

	let dir = PluginDir::new();
	let config_path = dir.file( "config/plugins.toml", b"archive_suffix = \".jar\"\n" );
	dir.plugin( "greeter.jar", "greeter", "acme::Greeter" );
	dir.plugin( "other.zip", "other", "acme::Other" );

	let config = LoaderConfig::from_file( &config_path ).unwrap();
	let ( descriptors, warnings ) = PluginLoader::new( ModuleRegistry::new() ).with_config( config ).discover( dir.path() ).unwrap();
	assert_no_warnings!( warnings );
	assert_eq!( descriptors.into_iter().collect::<Vec<_>>(), vec![ PluginDescriptor::new( "greeter", "acme::Greeter" )]);

}

#[test]
fn configured_format_custom_parser() {

	let dir = PluginDir::new();
	dir.archive( "greeter.zip", &[( METADATA_PATH, b"greeter=acme::Greeter" )]);

	let parser = | data: &[u8] | -> Result<PluginDescriptor, DescriptorParseError> {
		let text = std::str::from_utf8( data )?;
		let ( name, module ) = text.split_once( '=' )
			.ok_or_else(|| DescriptorParseError::Other( format!( "expected name=module, got '{}'", text )))?;
		Ok( PluginDescriptor::new( name.trim(), module.trim() ))
	};

	let ( descriptors, warnings ) = PluginLoader::new( ModuleRegistry::new() ).with_parser( parser ).discover( dir.path() ).unwrap();
	assert_no_warnings!( warnings );
	assert_eq!( descriptors.into_iter().collect::<Vec<_>>(), vec![ PluginDescriptor::new( "greeter", "acme::Greeter" )]);

}

#[test]
fn configured_format_rejects_empty_suffix() {

	let dir = PluginDir::new();
	dir.file( "readme.txt", b"not a plugin" );

	match PluginLoader::new( ModuleRegistry::new() ).with_archive_suffix( "" ).discover( dir.path() ) {
		Err( LoadError::Config( ConfigError::EmptySuffix )) => {},
		Err( err ) => panic!( "Unexpected error: {}", err ),
		Ok(( descriptors, warnings )) => panic!( "Expected failure, got {:?} with warnings {:?}", descriptors, warnings ),
	}

}

#[test]
fn configured_format_rejects_invalid_config_struct() {

	let dir = PluginDir::new();
	dir.file( "readme.txt", b"not a plugin" );

	let config = LoaderConfig { archive_suffix: ".zip".to_string(), metadata_path: "/plugin.toml".to_string() };
	let loader = PluginLoader::new( ModuleRegistry::new() ).with_config( config );

	assert!( matches!( loader.discover( dir.path() ), Err( LoadError::Config( ConfigError::AbsoluteMetadataPath( _ )))));
	assert!( matches!(
		loader.load_plugins( Container::empty(), dir.path(), None ),
		Err( LoadError::Config( ConfigError::AbsoluteMetadataPath( _ ))),
	));

}
