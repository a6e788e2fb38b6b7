use super::*;

fn pool() -> RenderTargetPool {
    RenderTargetPool::new(&[
        TargetDesc::new(4, 2, PixelFormat::Rgba32Float),
        TargetDesc::new(8, 1, PixelFormat::Rgba8Unorm).with_mips(2),
    ])
    .unwrap()
}

#[test]
fn scratch_covers_largest_extent() {
    let p = pool();
    assert_eq!(p.scratch.width(), 8);
    assert_eq!(p.scratch.height(), 2);
    assert_eq!(p.scratch.mip_count(), 2);
    assert_eq!(p.depth().width(), 8);
    assert_eq!(p.depth().height(), 2);
}

#[test]
fn invalid_descriptor_fails_construction() {
    let err = RenderTargetPool::new(&[TargetDesc::new(0, 4, PixelFormat::Rgba8Unorm)]).unwrap_err();
    assert!(matches!(err, SeqError::Validation(_)));
}

#[test]
fn check_rejects_out_of_pool_ids() {
    let p = pool();
    assert!(p.check(TargetId(1)).is_ok());
    assert!(p.check(TargetId(2)).is_err());
}

#[test]
fn non_aliasing_inputs_bind_directly() {
    let mut p = pool();
    let b = p.resolve_inputs(&[Some(TargetId(1)), None], TargetId(0));
    assert_eq!(b.as_slice(), &[Binding::Target(TargetId(1)), Binding::Unbound]);
    assert_eq!(p.aliasing_resolutions(), 0);
}

#[test]
fn aliasing_slot_reads_scratch_copy() {
    let mut p = pool();
    p.write(TargetId(0)).unwrap().put(3, 1, [0.5, 0.25, 0.0, 1.0]);

    let b = p.resolve_inputs(&[Some(TargetId(0)), Some(TargetId(1))], TargetId(0));
    assert_eq!(b[0], Binding::Scratch);
    assert_eq!(b[1], Binding::Target(TargetId(1)));
    assert_eq!(p.aliasing_resolutions(), 1);

    let seen = p
        .with_target_mut(TargetId(0), |target, reader| {
            // The checked-out slot is vacant; the scratch copy carries the pre-pass contents.
            let own = reader.view(Binding::Target(TargetId(0))).unwrap();
            assert_eq!(own.width(), 0);
            let copy = reader.view(b[0]).unwrap();
            assert_eq!((copy.width(), copy.height()), (4, 2));
            assert_eq!(target.width(), 4);
            copy.fetch(3, 1)
        })
        .unwrap();
    assert_eq!(seen, [0.5, 0.25, 0.0, 1.0]);
    assert_eq!(p.get(TargetId(0)).unwrap().width(), 4);
}

#[test]
fn begin_frame_clears_everything() {
    let mut p = pool();
    p.write(TargetId(1)).unwrap().fill([1.0; 4]);
    p.mark_written(TargetId(1));
    p.resolve_inputs(&[Some(TargetId(1))], TargetId(1));

    p.begin_frame();
    assert_eq!(p.last_written(), None);
    assert_eq!(p.aliasing_resolutions(), 0);
    assert!(
        p.get(TargetId(1))
            .unwrap()
            .read()
            .base()
            .texels()
            .iter()
            .all(|px| *px == [0.0; 4])
    );
}

#[test]
fn regenerate_mips_only_touches_mipped_targets() {
    let mut p = pool();
    p.write(TargetId(1)).unwrap().fill([1.0, 0.0, 0.0, 1.0]);
    p.regenerate_mips(TargetId(1));
    let top = p.get(TargetId(1)).unwrap().level(1).unwrap().fetch(0, 0);
    assert_eq!(top, [1.0, 0.0, 0.0, 1.0]);
    p.regenerate_mips(TargetId(0));
    p.regenerate_mips(TargetId(9));
}

#[test]
fn scratch_copy_carries_every_mip_level() {
    let mut p = pool();
    p.write(TargetId(1)).unwrap().fill([0.0, 1.0, 0.0, 1.0]);
    p.regenerate_mips(TargetId(1));
    p.resolve_inputs(&[Some(TargetId(1))], TargetId(1));

    let copy = p.scratch.read();
    assert_eq!((copy.width(), copy.height()), (8, 1));
    assert_eq!(p.scratch.level(1).map(|l| (l.width(), l.height())), Some((4, 1)));
    assert_eq!(copy.sample_level(0.5, 0.5, 1), [0.0, 1.0, 0.0, 1.0]);

    // A single-level source shrinks the copy back to one level.
    p.resolve_inputs(&[Some(TargetId(0))], TargetId(0));
    assert_eq!(p.scratch.mip_count(), 1);
    assert!(p.scratch.level(1).is_none());
}
