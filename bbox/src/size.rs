use crate::common::*;

/// Image or box extent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Size<T> {
    w: T,
    h: T,
}

impl<T> Size<T>
where
    T: Num + PartialOrd + Copy,
{
    pub fn try_from_wh(wh: [T; 2]) -> Result<Self> {
        let [w, h] = wh;
        let zero = T::zero();
        ensure!(
            w > zero && h > zero,
            "width and height parameters must be positive"
        );
        Ok(Self { w, h })
    }

    pub fn from_wh(wh: [T; 2]) -> Self {
        Self::try_from_wh(wh).unwrap()
    }

    pub fn w(&self) -> T {
        self.w
    }

    pub fn h(&self) -> T {
        self.h
    }
}
