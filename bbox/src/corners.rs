use super::{Center, Rect};
use crate::{common::*, Transform};

/// Bounding box in corner format, `(xmin, ymin, xmax, ymax)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Corners<T> {
    pub(crate) xmin: T,
    pub(crate) ymin: T,
    pub(crate) xmax: T,
    pub(crate) ymax: T,
}

impl<T> Corners<T>
where
    T: Copy + Num,
{
    pub fn transform(&self, transform: &Transform<T>) -> Self {
        Corners {
            xmin: self.xmin * transform.sx + transform.tx,
            ymin: self.ymin * transform.sy + transform.ty,
            xmax: self.xmax * transform.sx + transform.tx,
            ymax: self.ymax * transform.sy + transform.ty,
        }
    }
}

impl<T> Rect for Corners<T>
where
    T: Copy + Num + PartialOrd,
{
    type Type = T;

    fn xmin(&self) -> Self::Type {
        self.xmin
    }

    fn ymin(&self) -> Self::Type {
        self.ymin
    }

    fn xmax(&self) -> Self::Type {
        self.xmax
    }

    fn ymax(&self) -> Self::Type {
        self.ymax
    }

    fn cx(&self) -> Self::Type {
        let two = T::one() + T::one();
        (self.xmin + self.xmax) / two
    }

    fn cy(&self) -> Self::Type {
        let two = T::one() + T::one();
        (self.ymin + self.ymax) / two
    }

    fn w(&self) -> Self::Type {
        self.xmax - self.xmin
    }

    fn h(&self) -> Self::Type {
        self.ymax - self.ymin
    }

    fn try_from_corners(corners: [Self::Type; 4]) -> Result<Self> {
        let [xmin, ymin, xmax, ymax] = corners;
        ensure!(
            xmax >= xmin && ymax >= ymin,
            "xmax >= xmin and ymax >= ymin must hold"
        );

        Ok(Self {
            xmin,
            ymin,
            xmax,
            ymax,
        })
    }

    fn try_from_center(center: [Self::Type; 4]) -> Result<Self> {
        let [cx, cy, w, h] = center;
        let zero = T::zero();
        ensure!(w >= zero && h >= zero, "w and h must be non-negative");

        let two = T::one() + T::one();
        Ok(Self {
            xmin: cx - w / two,
            ymin: cy - h / two,
            xmax: cx + w / two,
            ymax: cy + h / two,
        })
    }
}

impl<T> From<Center<T>> for Corners<T>
where
    T: Copy + Num,
{
    fn from(from: Center<T>) -> Self {
        Self::from(&from)
    }
}

impl<T> From<&Center<T>> for Corners<T>
where
    T: Copy + Num,
{
    fn from(from: &Center<T>) -> Self {
        let two = T::one() + T::one();
        let Center { cx, cy, w, h } = *from;
        Self {
            xmin: cx - w / two,
            ymin: cy - h / two,
            xmax: cx + w / two,
            ymax: cy + h / two,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RectNum;

    #[test]
    fn corners_rejects_inverted() {
        assert!(Corners::try_from_corners([2.0, 0.0, 1.0, 1.0]).is_err());
        assert!(Corners::try_from_corners([0.0, 2.0, 1.0, 1.0]).is_err());
        assert!(Corners::try_from_corners([1.0, 1.0, 1.0, 1.0]).is_ok());
    }

    #[test]
    fn corners_from_center() {
        let center = Center::from_center([0.25f32, 0.5, 0.5, 1.0]);
        let corners: Corners<f32> = (&center).into();
        assert_eq!(corners.corners(), [0.0, 0.0, 0.5, 1.0]);
        assert_eq!(corners.to_center(), center);
    }
}
