//! Plugin metadata.
//!
//! Every plugin archive may carry one metadata resource naming the plugin and
//! the module type it contributes. The resource is TOML by default:
//!
//! ```toml
//! name = "greeter"
//! module = "acme::greeter::GreeterModule"
//! ```
//!
//! Other formats can be plugged in through [`DescriptorParser`].

use serde::Deserialize ;
use thiserror::Error ;



/// Identifies a plugin and the module type it contributes.
///
/// Descriptors compare by content, so two archives declaring identical
/// metadata collapse into a single descriptor during discovery.
#[derive( Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize )]
pub struct PluginDescriptor {
	name: String,
	module: String,
}

impl PluginDescriptor {

	pub fn new( name: impl Into<String>, module: impl Into<String> ) -> Self {
		Self { name: name.into(), module: module.into() }
	}

	/// Display name of the plugin.
	#[inline] pub fn name( &self ) -> &str { &self.name }

	/// Fully qualified name of the module type to instantiate.
	#[inline] pub fn module( &self ) -> &str { &self.module }

}

impl std::fmt::Display for PluginDescriptor {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result {
		write!( f, "{} ({})", self.name, self.module )
	}
}

/// The metadata resource could not be turned into a [`PluginDescriptor`].
#[derive( Error, Debug )]
pub enum DescriptorParseError {
	#[error( "Metadata is not valid UTF-8: {0}" )] Utf8( #[from] std::str::Utf8Error ),
	#[error( "Metadata is not valid TOML: {0}" )] Toml( #[from] toml::de::Error ),
	#[error( "Metadata field '{0}' is empty" )] EmptyField( &'static str ),
	#[error( "{0}" )] Other( String ),
}

/// Turns the raw bytes of a metadata resource into a [`PluginDescriptor`].
///
/// Implemented for closures with the matching signature, so a one-off format
/// does not need its own type.
pub trait DescriptorParser: Send + Sync {
	/// # Errors
	/// Returns a [`DescriptorParseError`] if `data` does not describe a plugin.
	fn parse( &self, data: &[u8] ) -> Result<PluginDescriptor, DescriptorParseError> ;
}

impl<F> DescriptorParser for F
where
	F: Fn( &[u8] ) -> Result<PluginDescriptor, DescriptorParseError> + Send + Sync,
{
	fn parse( &self, data: &[u8] ) -> Result<PluginDescriptor, DescriptorParseError> { self( data )}
}

/// Parses the default TOML metadata format.
#[derive( Debug, Clone, Copy, Default )]
pub struct TomlDescriptorParser ;

impl DescriptorParser for TomlDescriptorParser {
	fn parse( &self, data: &[u8] ) -> Result<PluginDescriptor, DescriptorParseError> {
		let descriptor: PluginDescriptor = toml::from_str( std::str::from_utf8( data )?)?;
		if descriptor.name.trim().is_empty() { return Err( DescriptorParseError::EmptyField( "name" )) }
		if descriptor.module.trim().is_empty() { return Err( DescriptorParseError::EmptyField( "module" )) }
		Ok( descriptor )
	}
}

#[cfg( test )]
mod tests {

	use super::* ;

	#[test]
	fn parses_name_and_module() {
		let descriptor = TomlDescriptorParser.parse( b"name = \"greeter\"\nmodule = \"acme::GreeterModule\"\nversion = \"1.0\"\n" ).unwrap();
		assert_eq!( descriptor, PluginDescriptor::new( "greeter", "acme::GreeterModule" ));
	}

	#[test]
	fn rejects_missing_module() {
		assert!( matches!( TomlDescriptorParser.parse( b"name = \"greeter\"\n" ), Err( DescriptorParseError::Toml( _ ))));
	}

	#[test]
	fn rejects_blank_fields() {
		assert!( matches!(
			TomlDescriptorParser.parse( b"name = \" \"\nmodule = \"acme::GreeterModule\"\n" ),
			Err( DescriptorParseError::EmptyField( "name" )),
		));
	}

	#[test]
	fn rejects_invalid_utf8() {
		assert!( matches!( TomlDescriptorParser.parse( &[ 0xff, 0xfe ]), Err( DescriptorParseError::Utf8( _ ))));
	}

}
