use super::*;

/// Transparency
///
/// For indexed color images this is one alpha value per palette entry. There
/// can be less alpha entries than palette entries, the missing entries are
/// fully opaque (`0xFF`).
///
/// Other color types use a different layout for this chunk, which this crate
/// doesn't read.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub struct tRNS<'b>(&'b [u8]);
impl<'b> From<&'b [u8]> for tRNS<'b> {
  #[inline]
  fn from(data: &'b [u8]) -> Self {
    Self(data)
  }
}
impl Debug for tRNS<'_> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_tuple("tRNS").field(&&self.0[..self.0.len().min(12)]).field(&self.0.len()).finish()
  }
}
impl<'b> tRNS<'b> {
  /// Gets the alpha values for each palette index.
  #[inline]
  #[must_use]
  pub const fn alphas(&self) -> &'b [u8] {
    self.0
  }

  /// The alpha for a palette index.
  #[inline]
  #[must_use]
  pub fn alpha_of(&self, index: u8) -> u8 {
    self.0.get(usize::from(index)).copied().unwrap_or(0xFF)
  }
}

#[test]
fn test_trns_alpha_of() {
  let trns = tRNS::from(&[0_u8, 128][..]);
  assert_eq!(trns.alpha_of(0), 0);
  assert_eq!(trns.alpha_of(1), 128);
  assert_eq!(trns.alpha_of(2), 255);
  assert_eq!(trns.alpha_of(255), 255);
}
