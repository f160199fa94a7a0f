/// Unit tests for BlockBatch batching and its fixed binding group.

use std::sync::{Arc, Mutex};

use crate::batch::{BlockBatch, BlockBatchDesc, BlockProperty};
use crate::error::Error;
use crate::renderer::mock_renderer::{MockRenderer, MockRenderTarget};
use crate::renderer::{RenderContext, Renderer};

fn test_context() -> (Arc<Mutex<MockRenderer>>, RenderContext) {
    let mock = Arc::new(Mutex::new(MockRenderer::new()));
    let renderer: Arc<Mutex<dyn Renderer>> = mock.clone();
    let target = Arc::new(MockRenderTarget::new(800, 600));
    (mock, RenderContext::new(renderer, target))
}

fn batch(ctx: &RenderContext, capacity: usize) -> BlockBatch {
    BlockBatch::new(
        ctx,
        BlockBatchDesc {
            capacity,
            ..Default::default()
        },
    )
    .unwrap()
}

fn block(x: f32, y: f32) -> BlockProperty {
    BlockProperty {
        x,
        y,
        width: 10.0,
        height: 10.0,
        ..Default::default()
    }
}

#[test]
fn test_block_binding_group_written_once_at_construction() {
    let (mock, ctx) = test_context();
    let mut blocks = batch(&ctx, 8);

    {
        let mock = mock.lock().unwrap();
        assert_eq!(*mock.pool_allocations.lock().unwrap(), 1);
        let updates = mock.binding_updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0], vec![0]);
    }

    // Drawing never rewrites the group
    blocks.begin(&ctx, &[]).unwrap();
    blocks.draw(&block(0.0, 0.0)).unwrap();
    blocks.end().unwrap();

    let mock = mock.lock().unwrap();
    assert_eq!(mock.binding_updates.lock().unwrap().len(), 1);
}

#[test]
fn test_block_draw_requires_begin() {
    let (_mock, ctx) = test_context();
    let mut blocks = batch(&ctx, 8);

    assert!(matches!(
        blocks.draw(&block(0.0, 0.0)),
        Err(Error::NotDrawing)
    ));
}

#[test]
fn test_thousand_blocks_one_submission() {
    let (mock, ctx) = test_context();
    let mut blocks = batch(&ctx, 1000);

    blocks.begin(&ctx, &[]).unwrap();
    for i in 0..1000 {
        blocks.draw(&block(i as f32, 0.0)).unwrap();
    }
    assert_eq!(blocks.pending_blocks(), 1000);
    let last = blocks.end().unwrap();

    assert!(last.is_some());
    let mock = mock.lock().unwrap();
    assert_eq!(mock.get_submissions().len(), 1);
    assert!(mock
        .get_command_log()
        .contains(&"draw_indexed 6000 0 0".to_string()));
}

#[test]
fn test_block_capacity_overflow_is_an_error() {
    let (_mock, ctx) = test_context();
    let mut blocks = batch(&ctx, 2);

    blocks.begin(&ctx, &[]).unwrap();
    blocks.draw(&block(0.0, 0.0)).unwrap();
    blocks.draw(&block(1.0, 0.0)).unwrap();
    assert!(matches!(
        blocks.draw(&block(2.0, 0.0)),
        Err(Error::BatchFull { capacity: 2 })
    ));

    blocks.flush().unwrap();
    assert!(blocks.draw(&block(2.0, 0.0)).is_ok());
    blocks.end().unwrap();
}

#[test]
fn test_block_empty_frame_returns_none() {
    let (mock, ctx) = test_context();
    let mut blocks = batch(&ctx, 8);

    blocks.begin(&ctx, &[]).unwrap();
    let last = blocks.end().unwrap();

    assert!(last.is_none());
    assert!(mock.lock().unwrap().get_submissions().is_empty());
}

#[test]
fn test_block_explicit_flushes_chain() {
    let (mock, ctx) = test_context();
    let mut blocks = batch(&ctx, 8);

    blocks.begin(&ctx, &[]).unwrap();
    blocks.draw(&block(0.0, 0.0)).unwrap();
    blocks.flush().unwrap();
    blocks.draw(&block(1.0, 0.0)).unwrap();
    let last = blocks.end().unwrap().unwrap();

    let submissions = mock.lock().unwrap().get_submissions();
    assert_eq!(submissions.len(), 2);
    assert!(Arc::ptr_eq(
        &submissions[1].wait_semaphores[0],
        &submissions[0].signal_semaphores[0]
    ));
    assert!(Arc::ptr_eq(&last, &submissions[1].signal_semaphores[0]));
}

#[test]
fn test_block_reload_adopts_new_generation() {
    let (_mock, mut ctx) = test_context();
    let mut blocks = batch(&ctx, 8);
    let old_projection = *blocks.projection();

    ctx.set_target(Arc::new(MockRenderTarget::new(400, 300)));
    blocks.reload(&ctx).unwrap();

    assert_ne!(*blocks.projection(), old_projection);
    blocks.begin(&ctx, &[]).unwrap();
    blocks.draw(&block(0.0, 0.0)).unwrap();
    blocks.end().unwrap();
}
