use super::{Corners, Rect};
use crate::{common::*, Size};

/// Bounding box in center format, `(cx, cy, w, h)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Center<T> {
    pub(crate) cx: T,
    pub(crate) cy: T,
    pub(crate) w: T,
    pub(crate) h: T,
}

impl<T> Center<T>
where
    T: Copy + Num + PartialOrd,
{
    /// Express the box relative to an image of the given size.
    ///
    /// `cx` and `w` are divided by the width, `cy` and `h` by the height.
    pub fn normalize(&self, size: &Size<T>) -> Self {
        let Self { cx, cy, w, h } = *self;
        let (size_w, size_h) = (size.w(), size.h());
        Self {
            cx: cx / size_w,
            cy: cy / size_h,
            w: w / size_w,
            h: h / size_h,
        }
    }
}

impl<T> Rect for Center<T>
where
    T: Copy + Num + PartialOrd,
{
    type Type = T;

    fn xmin(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.cx - self.w / two
    }

    fn ymin(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.cy - self.h / two
    }

    fn xmax(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.cx + self.w / two
    }

    fn ymax(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.cy + self.h / two
    }

    fn cx(&self) -> Self::Type {
        self.cx
    }

    fn cy(&self) -> Self::Type {
        self.cy
    }

    fn w(&self) -> Self::Type {
        self.w
    }

    fn h(&self) -> Self::Type {
        self.h
    }

    fn try_from_corners(corners: [T; 4]) -> Result<Self> {
        let [xmin, ymin, xmax, ymax] = corners;
        ensure!(
            xmax >= xmin && ymax >= ymin,
            "box width and height must be non-negative"
        );

        Ok(Self::from(&Corners {
            xmin,
            ymin,
            xmax,
            ymax,
        }))
    }

    fn try_from_center(center: [T; 4]) -> Result<Self> {
        let [cx, cy, w, h] = center;
        let zero = T::zero();
        ensure!(
            w >= zero && h >= zero,
            "box width and height must be non-negative"
        );

        Ok(Self { cx, cy, w, h })
    }
}

impl<T> From<Corners<T>> for Center<T>
where
    T: Copy + Num,
{
    fn from(from: Corners<T>) -> Self {
        Self::from(&from)
    }
}

impl<T> From<&Corners<T>> for Center<T>
where
    T: Copy + Num,
{
    fn from(from: &Corners<T>) -> Self {
        let two = T::one() + T::one();
        let Corners {
            xmin,
            ymin,
            xmax,
            ymax,
        } = *from;
        Self {
            cx: (xmin + xmax) / two,
            cy: (ymin + ymax) / two,
            w: xmax - xmin,
            h: ymax - ymin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RectNum;
    use approx::assert_abs_diff_eq;

    #[test]
    fn center_from_corners() {
        let corners = Corners::from_corners([30.0, 30.0, 150.0, 150.0]);
        let center = Center::from(&corners);
        assert_eq!(center.center(), [90.0, 90.0, 120.0, 120.0]);
    }

    #[test]
    fn center_normalize() {
        let center = Center::from_center([90.0, 60.0, 120.0, 30.0]);
        let size = Size::from_wh([300.0, 200.0]);
        let [cx, cy, w, h] = center.normalize(&size).center();
        assert_abs_diff_eq!(cx, 0.3);
        assert_abs_diff_eq!(cy, 0.3);
        assert_abs_diff_eq!(w, 0.4);
        assert_abs_diff_eq!(h, 0.15);
    }
}
