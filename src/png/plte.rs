use super::*;

/// Palette data
///
/// Palette entries are always RGB.
///
/// If you want to have a paletted image with transparency then the transparency
/// info goes in a separate transparency chunk.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PLTE<'b>(&'b [RGB8]);
impl<'b> From<&'b [RGB8]> for PLTE<'b> {
  #[inline]
  fn from(entries: &'b [RGB8]) -> Self {
    Self(entries)
  }
}
impl<'b> TryFrom<&'b [u8]> for PLTE<'b> {
  type Error = PngError;
  /// The chunk data must be a whole number of RGB entries.
  #[inline]
  fn try_from(data: &'b [u8]) -> Result<Self, Self::Error> {
    bytemuck::try_cast_slice::<u8, RGB8>(data).map(Self).map_err(|_| PngError::MalformedPalette)
  }
}
impl Debug for PLTE<'_> {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    // currently prints no more than 4 palette entries
    f.debug_tuple("PLTE").field(&&self.0[..self.0.len().min(4)]).field(&self.0.len()).finish()
  }
}
impl<'b> PLTE<'b> {
  /// Gets the entries as a slice.
  #[inline]
  #[must_use]
  pub fn entries(&self) -> &'b [RGB8] {
    self.0
  }
}

#[test]
fn test_plte_try_from() {
  let data = [1_u8, 2, 3, 4, 5, 6];
  let plte = PLTE::try_from(&data[..]).unwrap();
  assert_eq!(plte.entries(), &[RGB8 { r: 1, g: 2, b: 3 }, RGB8 { r: 4, g: 5, b: 6 }]);
  assert_eq!(PLTE::try_from(&data[..5]), Err(PngError::MalformedPalette));
  assert!(PLTE::try_from(&data[..0]).unwrap().entries().is_empty());
}
