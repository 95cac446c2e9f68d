#![forbid(unsafe_code)]

//! Just has shorthands for various int parsing things you'd want to do.

#[inline]
#[must_use]
pub fn try_split_off_byte_array<const N: usize>(bytes: &[u8]) -> Option<([u8; N], &[u8])> {
  if bytes.len() >= N {
    let (head, tail) = bytes.split_at(N);
    let a: [u8; N] = head.try_into().ok()?;
    Some((a, tail))
  } else {
    None
  }
}

#[inline]
#[must_use]
pub fn try_split_off_u32_be(bytes: &[u8]) -> Option<(u32, &[u8])> {
  try_split_off_byte_array::<4>(bytes).map(|(a, tail)| (u32::from_be_bytes(a), tail))
}

#[inline]
#[must_use]
pub fn try_split_off_slice(bytes: &[u8], len: usize) -> Option<(&[u8], &[u8])> {
  if bytes.len() >= len {
    Some(bytes.split_at(len))
  } else {
    None
  }
}

#[test]
fn test_try_split_off() {
  let bytes = [0, 0, 1, 2, 9, 9];
  assert_eq!(try_split_off_u32_be(&bytes), Some((0x0102, &bytes[4..])));
  assert_eq!(try_split_off_u32_be(&bytes[3..]), None);
  assert_eq!(try_split_off_slice(&bytes, 6), Some((&bytes[..], &[][..])));
  assert_eq!(try_split_off_slice(&bytes, 7), None);
}
