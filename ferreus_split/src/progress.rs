/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines progress reporting messages, sinks, and helper functions for the splitting pipeline.
//
// Created on: 02 Mar 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Progress reporting primitives for the partition setup phase.

use crate::assignment::AssignmentCase;
use std::fmt::Debug;
use std::sync::{Arc, mpsc};
use std::thread;

/// Progress events emitted while a splitting is being set up.
#[derive(Debug, Clone)]
pub enum ProgressMsg {
    /// The partition description was read.
    PartitionParsed {
        num_nodes: usize,
        num_regions: usize,
        num_records: usize,
    },

    /// Membership records were grouped by node and by region.
    RegionIndexBuilt { num_interface_nodes: usize },

    /// Processes were mapped onto regions.
    AssignmentResolved {
        case: AssignmentCase,
        num_processes: usize,
        num_inactive: usize,
    },

    /// Row maps were created for a rank.
    RowMapsCreated {
        rank: usize,
        num_global_rows: usize,
        num_owned_regions: usize,
    },

    /// Arbitrary informational message.
    Message { message: String },
}

/// Sink that consumes progress messages.
pub trait ProgressSink: Send + Sync + Debug {
    fn emit(&self, msg: ProgressMsg);
}

/// Progress sink that forwards messages over a channel.
#[derive(Debug)]
pub struct ClosureSink {
    tx: mpsc::SyncSender<ProgressMsg>,
}

impl ProgressSink for ClosureSink {
    #[inline]
    fn emit(&self, msg: ProgressMsg) {
        let _ = self.tx.try_send(msg);
    }
}

/// Spawns a listener thread that runs a handler closure for each progress message.
///
/// The listener exits once every clone of the returned sink has been dropped.
pub fn closure_sink<F>(
    buffer: usize,
    mut handler: F,
) -> (Arc<dyn ProgressSink>, thread::JoinHandle<()>)
where
    F: FnMut(ProgressMsg) + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel::<ProgressMsg>(buffer.max(1));
    let sink: Arc<dyn ProgressSink> = Arc::new(ClosureSink { tx });

    let handle = thread::spawn(move || {
        while let Ok(msg) = rx.recv() {
            handler(msg);
        }
    });

    (sink, handle)
}

/// Emits `msg` if a sink is installed.
#[inline]
pub(crate) fn report(sink: &Option<Arc<dyn ProgressSink>>, msg: ProgressMsg) {
    if let Some(sink) = sink {
        sink.emit(msg);
    }
}
