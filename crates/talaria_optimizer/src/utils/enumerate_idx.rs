use std::marker::PhantomData;

/// Iterator adapter yielding typed indices (`RouteIdx`, `JobIdx`, ...) instead of `usize`.
pub struct EnumerateIdxIter<I, Idx> {
    iter: I,
    count: usize,
    _index: PhantomData<Idx>,
}

pub trait EnumerateIdx: Iterator + Sized {
    fn enumerate_idx<Idx>(self) -> EnumerateIdxIter<Self, Idx>
    where
        Idx: From<usize>,
    {
        EnumerateIdxIter {
            iter: self,
            count: 0,
            _index: PhantomData,
        }
    }
}

impl<I: Iterator> EnumerateIdx for I {}

impl<I, Idx> Iterator for EnumerateIdxIter<I, Idx>
where
    I: Iterator,
    Idx: From<usize>,
{
    type Item = (Idx, I::Item);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.iter.next()?;
        let index = Idx::from(self.count);
        self.count += 1;
        Some((index, item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}
