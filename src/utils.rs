//! Partial success plumbing shared by every loading stage.
//!
//! Loading a plugin directory is best-effort: a single bad archive or module
//! must not abort the whole pass. Stages therefore hand back what they managed
//! to produce together with the errors they recovered from.

/// Represents a successful operation where some parts failed but didn't prevent overall success.
/// The `Vec<E>` contains errors from the failed parts that were handled gracefully.
pub type PartialSuccess<T, E> = ( T, Vec<E> );

/// Concatenates error lists collected by consecutive stages, converting
/// stage-specific errors into the caller's error type along the way.
pub(crate) trait Merge<E> {
	fn merge_all<I>( self, other: I ) -> Self
	where
		I: IntoIterator,
		I::Item: Into<E> ;
}

impl<E> Merge<E> for Vec<E> {
	fn merge_all<I>( mut self, other: I ) -> Self
	where
		I: IntoIterator,
		I::Item: Into<E>,
	{
		self.extend( other.into_iter().map( Into::into ));
		self
	}
}

#[cfg( test )]
mod tests {

	use super::Merge ;

	#[test]
	fn merge_all_converts_and_keeps_order() {
		let merged: Vec<i64> = vec![ 1_i64, 2 ].merge_all( vec![ 3_i32, 4 ]);
		assert_eq!( merged, vec![ 1, 2, 3, 4 ]);
	}

}
