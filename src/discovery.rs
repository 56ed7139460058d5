use std::collections::BTreeSet ;
use std::path::{ Path, PathBuf };
use itertools::Itertools ;
use thiserror::Error ;

use crate::archive::{ ArchiveError, PluginArchive };
use crate::descriptor::{ DescriptorParseError, DescriptorParser, PluginDescriptor };
use crate::utils::PartialSuccess ;



/// An archive was skipped while collecting plugin metadata.
#[derive( Error, Debug )]
pub enum DiscoveryError {
	#[error( "Unable to read plugin archive '{}': {source}", .archive.display() )]
	UnreadableArchive { archive: PathBuf, source: ArchiveError },
	#[error( "Metadata of '{}' is not valid: {source}", .archive.display() )]
	MalformedMetadata { archive: PathBuf, source: DescriptorParseError },
}

/// Reads the metadata resource of every archive and parses it into a descriptor.
///
/// Archives without the resource contribute nothing. Unreadable archives and
/// malformed metadata are reported and skipped. Descriptors with identical
/// content are merged.
pub(crate) fn extract_descriptors(
	archives: &[PathBuf],
	metadata_path: &str,
	parser: &dyn DescriptorParser,
) -> PartialSuccess<BTreeSet<PluginDescriptor>, DiscoveryError> {

	let ( found, errors ) = archives.iter()
		.map(| archive | extract_descriptor( archive, metadata_path, parser ))
		.partition_result::<Vec<_>, Vec<_>, _, _>();

	errors.iter().for_each(| err | tracing::warn!( error = %err, "Skipping plugin archive" ));

	( found.into_iter().flatten().collect(), errors )

}

fn extract_descriptor(
	archive_path: &Path,
	metadata_path: &str,
	parser: &dyn DescriptorParser,
) -> Result<Option<PluginDescriptor>, DiscoveryError> {

	let unreadable = | source | DiscoveryError::UnreadableArchive { archive: archive_path.to_path_buf(), source };

	// NOTE: the handle is scoped to this call so the archive is closed on every path
	let mut archive = PluginArchive::open( archive_path ).map_err( unreadable )?;
	let Some( data ) = archive.read_entry( metadata_path ).map_err( unreadable )? else {
		tracing::debug!( archive = %archive.path().display(), "Archive carries no plugin metadata" );
		return Ok( None );
	};

	parser.parse( &data )
		.map( Some )
		.map_err(| source | DiscoveryError::MalformedMetadata { archive: archive_path.to_path_buf(), source })

}
