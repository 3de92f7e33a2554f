use proptest::prelude::*;

#[allow(dead_code)]
pub fn assert_eq_iters<I: Iterator, J: Iterator<Item = I::Item>>(
    mut i: I,
    mut j: J,
) where
    I::Item: std::fmt::Debug + Eq,
{
    loop {
        match (i.next(), j.next()) {
            (None, None) => return,
            (a, b) => assert_eq!(a, b),
        }
    }
}

pub type U16Seq = Vec<u16>;

#[allow(dead_code)]
pub fn small_int_seq() -> impl Strategy<Value = U16Seq> {
    prop::collection::vec(0u16..1024u16, 0..512)
}

// sequences drawn from a narrow key range to force collisions
#[allow(dead_code)]
pub fn u16_seq(range: u16, len: usize) -> impl Strategy<Value = U16Seq> {
    prop::collection::vec(0u16..range, len)
}

#[allow(dead_code)]
pub fn small_int_pairs() -> impl Strategy<Value = Vec<(u16, u16)>> {
    prop::collection::vec((0u16..1024u16, 0u16..1024u16), 0..512)
}
