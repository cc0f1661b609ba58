use super::{Center, Corners};
use crate::common::*;

/// The generic rectangle.
pub trait Rect {
    type Type;

    fn xmin(&self) -> Self::Type;
    fn ymin(&self) -> Self::Type;
    fn xmax(&self) -> Self::Type;
    fn ymax(&self) -> Self::Type;
    fn cx(&self) -> Self::Type;
    fn cy(&self) -> Self::Type;
    fn w(&self) -> Self::Type;
    fn h(&self) -> Self::Type;

    fn try_from_corners(corners: [Self::Type; 4]) -> Result<Self>
    where
        Self: Sized;

    fn try_from_center(center: [Self::Type; 4]) -> Result<Self>
    where
        Self: Sized;
}

pub trait RectNum: Rect
where
    Self::Type: Num + PartialOrd,
{
    fn from_corners(corners: [Self::Type; 4]) -> Self
    where
        Self: Sized,
    {
        Self::try_from_corners(corners).unwrap()
    }

    fn from_center(center: [Self::Type; 4]) -> Self
    where
        Self: Sized,
    {
        Self::try_from_center(center).unwrap()
    }

    /// Coordinates in `[xmin, ymin, xmax, ymax]` order.
    fn corners(&self) -> [Self::Type; 4] {
        [self.xmin(), self.ymin(), self.xmax(), self.ymax()]
    }

    /// Coordinates in `[cx, cy, w, h]` order.
    fn center(&self) -> [Self::Type; 4] {
        [self.cx(), self.cy(), self.w(), self.h()]
    }

    fn to_corners(&self) -> Corners<Self::Type> {
        Corners {
            xmin: self.xmin(),
            ymin: self.ymin(),
            xmax: self.xmax(),
            ymax: self.ymax(),
        }
    }

    fn to_center(&self) -> Center<Self::Type> {
        Center {
            cx: self.cx(),
            cy: self.cy(),
            w: self.w(),
            h: self.h(),
        }
    }

    fn area(&self) -> <Self::Type as Mul<Self::Type>>::Output
    where
        Self::Type: Mul<Self::Type>,
    {
        self.w() * self.h()
    }

    /// Returns true if the rectangle has zero width or zero height.
    fn is_degenerate(&self) -> bool {
        let zero = Self::Type::zero();
        self.w() <= zero || self.h() <= zero
    }
}

pub trait RectFloat: RectNum
where
    Self::Type: Float,
{
    /// Compute the overlapping region in corner format.
    fn intersect_with<R>(&self, other: &R) -> Option<Corners<Self::Type>>
    where
        R: Rect<Type = Self::Type>,
    {
        let xmin = self.xmin().max(other.xmin());
        let ymin = self.ymin().max(other.ymin());
        let xmax = self.xmax().min(other.xmax());
        let ymax = self.ymax().min(other.ymax());
        (xmax > xmin && ymax > ymin).then(|| Corners {
            xmin,
            ymin,
            xmax,
            ymax,
        })
    }

    fn intersection_area_with<R>(&self, other: &R) -> Self::Type
    where
        R: Rect<Type = Self::Type>,
    {
        self.intersect_with(other)
            .map(|rect| rect.area())
            .unwrap_or_else(Self::Type::zero)
    }

    /// Intersection over union.
    ///
    /// Degenerate rectangles have no area, so any pair with a non-positive
    /// union yields zero.
    fn iou_with<R>(&self, other: &R) -> Self::Type
    where
        R: Rect<Type = Self::Type>,
    {
        let zero = Self::Type::zero();
        let inter_area = self.intersection_area_with(other);
        let union_area = self.area() + other.area() - inter_area;
        if union_area <= zero || inter_area <= zero {
            return zero;
        }
        (inter_area / union_area).min(Self::Type::one())
    }
}

impl<T> RectNum for T
where
    T: Rect,
    T::Type: Num + PartialOrd,
{
}

impl<T> RectFloat for T
where
    T: Rect,
    T::Type: Float,
{
}
