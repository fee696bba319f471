/// Implements [`Iterator`], [`DoubleEndedIterator`], [`ExactSizeIterator`] and [`FusedIterator`](`core::iter::FusedIterator`)
/// for a wrapper by forwarding to its `inner` iterator.
macro_rules! forward_iterator {
	($name:ident<$($lt:lifetime,)? $($generic:ident),*> => $item:ty) => {
		impl<$($lt,)? $($generic),*> Iterator for $name<$($lt,)? $($generic),*> {
			type Item = $item;

			fn next(&mut self) -> Option<Self::Item> {
				self.inner.next()
			}

			fn size_hint(&self) -> (usize, Option<usize>) {
				self.inner.size_hint()
			}
		}

		impl<$($lt,)? $($generic),*> DoubleEndedIterator for $name<$($lt,)? $($generic),*> {
			fn next_back(&mut self) -> Option<Self::Item> {
				self.inner.next_back()
			}
		}

		impl<$($lt,)? $($generic),*> ExactSizeIterator for $name<$($lt,)? $($generic),*> {}
		impl<$($lt,)? $($generic),*> core::iter::FusedIterator for $name<$($lt,)? $($generic),*> {}
	};
}
