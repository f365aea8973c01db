use super::Rect;
use crate::common::*;

/// Bounding box in pixel coordinates, stored as origin plus extent.
///
/// The fields are not validated. Negative extents are representable and
/// it is up to the caller to give them meaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct XYWH<T> {
    pub x: T,
    pub y: T,
    pub w: T,
    pub h: T,
}

impl<T> XYWH<T> {
    pub fn new(x: T, y: T, w: T, h: T) -> Self {
        Self { x, y, w, h }
    }
}

impl<T> XYWH<T>
where
    T: Copy + Num,
{
    pub fn is_zero(&self) -> bool {
        let zero = T::zero();
        self.x == zero && self.y == zero && self.w == zero && self.h == zero
    }
}

impl<T> From<[T; 4]> for XYWH<T> {
    fn from([x, y, w, h]: [T; 4]) -> Self {
        Self { x, y, w, h }
    }
}

impl<T> Rect for XYWH<T>
where
    T: Copy + Num + PartialOrd,
{
    type Type = T;

    fn t(&self) -> Self::Type {
        self.y
    }

    fn l(&self) -> Self::Type {
        self.x
    }

    fn b(&self) -> Self::Type {
        self.y + self.h
    }

    fn r(&self) -> Self::Type {
        self.x + self.w
    }

    fn h(&self) -> Self::Type {
        self.h
    }

    fn w(&self) -> Self::Type {
        self.w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TLBR;

    #[test]
    fn xywh_default_is_zero() {
        let bbox: XYWH<i32> = XYWH::default();
        assert!(bbox.is_zero());
        assert!(!XYWH::new(0, 0, 1, 0).is_zero());
    }

    #[test]
    fn xywh_accepts_negative_extent() {
        let bbox = XYWH::new(10, 10, -4, -2);
        assert_eq!(bbox.r(), 6);
        assert_eq!(bbox.b(), 8);
        assert!(TLBR::try_from(&bbox).is_err());
    }
}
