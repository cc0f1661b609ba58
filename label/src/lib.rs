use bbox::{Center, Corners, Rect, RectNum, Size};
use num_traits::{Float, NumCast};

/// A bounding box with its class id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label<R>
where
    R: Rect,
{
    pub rect: R,
    pub class: usize,
}

impl<T> Label<Corners<T>>
where
    T: Float,
{
    pub fn to_row(&self) -> [T; 5] {
        let [xmin, ymin, xmax, ymax] = self.rect.corners();
        [xmin, ymin, xmax, ymax, class_to_float(self.class)]
    }
}

impl<T> Label<Center<T>>
where
    T: Float,
{
    pub fn to_row(&self) -> [T; 5] {
        let [cx, cy, w, h] = self.rect.center();
        [cx, cy, w, h, class_to_float(self.class)]
    }
}

/// A fixed-capacity annotation slot: either a real object or padding.
///
/// Padding encodes to the row `(0, 0, 0, 0, -1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<R>
where
    R: Rect,
{
    Object(Label<R>),
    Padding,
}

impl<R> Slot<R>
where
    R: Rect,
{
    pub fn label(&self) -> Option<&Label<R>> {
        match self {
            Self::Object(label) => Some(label),
            Self::Padding => None,
        }
    }

    pub fn is_padding(&self) -> bool {
        matches!(self, Self::Padding)
    }

    pub fn map_rect<S, F>(&self, f: F) -> Slot<S>
    where
        S: Rect,
        F: FnOnce(&R) -> S,
    {
        match self {
            Self::Object(label) => Slot::Object(Label {
                rect: f(&label.rect),
                class: label.class,
            }),
            Self::Padding => Slot::Padding,
        }
    }
}

impl<T> Slot<Corners<T>>
where
    T: Float,
{
    /// The `[xmin, ymin, xmax, ymax, class]` row.
    pub fn to_row(&self) -> [T; 5] {
        match self {
            Self::Object(label) => label.to_row(),
            Self::Padding => padding_row(),
        }
    }

    pub fn to_center(&self) -> Slot<Center<T>> {
        self.map_rect(|rect| rect.to_center())
    }
}

impl<T> Slot<Center<T>>
where
    T: Float,
{
    /// The `[cx, cy, w, h, class]` row.
    pub fn to_row(&self) -> [T; 5] {
        match self {
            Self::Object(label) => label.to_row(),
            Self::Padding => padding_row(),
        }
    }

    pub fn normalize(&self, size: &Size<T>) -> Self {
        self.map_rect(|rect| rect.normalize(size))
    }
}

fn class_to_float<T>(class: usize) -> T
where
    T: Float,
{
    <T as NumCast>::from(class).unwrap_or_else(T::nan)
}

fn padding_row<T>() -> [T; 5]
where
    T: Float,
{
    let zero = T::zero();
    [zero, zero, zero, zero, -T::one()]
}
