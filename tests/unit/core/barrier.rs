//! Unit tests for the countdown barrier

use std::time::Duration;
use taskdemo::core::barrier::CountdownBarrier;
use tokio::time::sleep;

fn crash() {
    panic!("simulated crash");
}

#[tokio::test]
async fn test_zero_count_is_released_immediately() {
    let barrier = CountdownBarrier::new(0);
    assert!(barrier.is_released());
    assert!(barrier.wait_timeout(Duration::from_millis(10)).await);
}

#[test]
fn test_each_guard_counts_down_once() {
    let barrier = CountdownBarrier::new(3);
    let first = barrier.guard();
    let second = barrier.guard();
    let third = barrier.guard();

    drop(first);
    assert_eq!(barrier.remaining(), 2);
    assert_eq!(barrier.signals(), 1);

    second.release();
    assert_eq!(barrier.remaining(), 1);

    drop(third);
    assert_eq!(barrier.remaining(), 0);
    assert_eq!(barrier.signals(), 3);
}

#[test]
fn test_surplus_guards_do_not_wrap() {
    let barrier = CountdownBarrier::new(1);
    drop(barrier.guard());
    drop(barrier.guard());
    assert_eq!(barrier.remaining(), 0);
    assert_eq!(barrier.signals(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_wait_returns_once_every_task_signals() {
    let barrier = CountdownBarrier::new(10);
    for i in 0..10u64 {
        let done = barrier.guard();
        tokio::spawn(async move {
            let _done = done;
            sleep(Duration::from_millis(10 * (i + 1))).await;
        });
    }

    assert!(barrier.wait_timeout(Duration::from_secs(1)).await);
    assert_eq!(barrier.signals(), 10);
}

#[tokio::test(start_paused = true)]
async fn test_wait_blocks_while_a_guard_is_held() {
    let barrier = CountdownBarrier::new(2);
    let held = barrier.guard();
    drop(barrier.guard());

    assert!(!barrier.wait_timeout(Duration::from_millis(100)).await);
    drop(held);
    assert!(barrier.wait_timeout(Duration::from_millis(100)).await);
}

#[tokio::test(start_paused = true)]
async fn test_aborted_task_still_signals() {
    let barrier = CountdownBarrier::new(2);

    let stuck = {
        let done = barrier.guard();
        tokio::spawn(async move {
            let _done = done;
            sleep(Duration::from_secs(3600)).await;
        })
    };
    {
        let done = barrier.guard();
        tokio::spawn(async move {
            let _done = done;
        });
    }

    sleep(Duration::from_millis(10)).await;
    stuck.abort();

    assert!(barrier.wait_timeout(Duration::from_secs(1)).await);
    assert_eq!(barrier.signals(), 2);
}

#[tokio::test]
async fn test_panicking_task_still_signals() {
    let barrier = CountdownBarrier::new(1);
    let done = barrier.guard();
    let handle = tokio::spawn(async move {
        let _done = done;
        crash();
    });

    assert!(handle.await.unwrap_err().is_panic());
    assert!(barrier.wait_timeout(Duration::from_millis(100)).await);
    assert_eq!(barrier.signals(), 1);
}
