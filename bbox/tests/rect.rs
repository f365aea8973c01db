use anyhow::Result;
use bbox::{prelude::*, TLBR, XYWH};

#[test]
fn xywh_to_tlbr() -> Result<()> {
    let tlbr = TLBR::try_from(&XYWH::new(1, 2, 3, 4))?;
    assert_eq!(tlbr, TLBR::try_from_tlbr([2, 1, 6, 4])?);
    assert_eq!([tlbr.h(), tlbr.w()], [4, 3]);

    assert!(TLBR::try_from_tlbr([2, 1, 0, 4]).is_err());
    Ok(())
}

#[test]
fn integer_box_area_and_intersection() -> Result<()> {
    let lhs = XYWH::new(0, 0, 10, 10);
    let rhs = XYWH::new(5, 5, 10, 10);
    assert_eq!(lhs.area(), 100);

    let inter = lhs.intersect_with(&rhs).unwrap();
    assert_eq!(inter, TLBR::try_from_tlbr([5, 5, 10, 10])?);
    assert_eq!(inter.area(), 25);

    let apart = XYWH::new(20, 20, 1, 1);
    assert!(lhs.intersect_with(&apart).is_none());
    Ok(())
}

#[test]
fn xywh_serde_shape() -> Result<()> {
    let text = serde_json::to_string(&XYWH::new(1, 2, 3, 4))?;
    assert_eq!(text, r#"{"x":1,"y":2,"w":3,"h":4}"#);
    let bbox: XYWH<i32> = serde_json::from_str(&text)?;
    assert_eq!(bbox, XYWH::from([1, 2, 3, 4]));
    Ok(())
}
