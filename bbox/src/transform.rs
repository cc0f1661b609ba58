use super::{Corners, Rect};
use crate::{common::*, RectNum, Size};

/// Axis-aligned affine transform with independent x and y factors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transform<T> {
    pub sx: T,
    pub sy: T,
    pub tx: T,
    pub ty: T,
}

impl<T> Transform<T>
where
    T: Copy + Num + PartialOrd,
{
    pub fn from_rects<R>(src: &R, tgt: &R) -> Self
    where
        R: Rect<Type = T>,
    {
        let sx = tgt.w() / src.w();
        let sy = tgt.h() / src.h();
        let tx = tgt.xmin() - src.xmin() * sx;
        let ty = tgt.ymin() - src.ymin() * sy;

        Self { sx, sy, tx, ty }
    }

    /// The transform that stretches an image of `src_size` onto `tgt_size`
    /// without preserving the aspect ratio.
    pub fn from_sizes_exact(src_size: &Size<T>, tgt_size: &Size<T>) -> Self {
        let zero = T::zero();
        let src = Corners::from_corners([zero, zero, src_size.w(), src_size.h()]);
        let tgt = Corners::from_corners([zero, zero, tgt_size.w(), tgt_size.h()]);
        Self::from_rects(&src, &tgt)
    }
}

impl<T> Mul<&Corners<T>> for &Transform<T>
where
    T: Copy + Num,
{
    type Output = Corners<T>;

    fn mul(self, rhs: &Corners<T>) -> Self::Output {
        rhs.transform(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_exact() {
        let transform =
            Transform::from_sizes_exact(&Size::from_wh([80.0, 80.0]), &Size::from_wh([40.0, 20.0]));
        let expect = Transform {
            sx: 0.5,
            sy: 0.25,
            tx: 0.0,
            ty: 0.0,
        };
        assert_eq!(transform, expect);
    }

    #[test]
    fn resize_corners() {
        let transform = Transform::from_sizes_exact(
            &Size::from_wh([100.0, 100.0]),
            &Size::from_wh([300.0, 300.0]),
        );
        let rect = Corners::from_corners([10.0, 10.0, 50.0, 50.0]);
        let resized = &transform * &rect;
        assert_eq!(resized.corners(), [30.0, 30.0, 150.0, 150.0]);
    }
}
