// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::record::Record;
use std::fmt::Debug;

pub trait Handler: Debug + Send + Sync {
    /**
        Submits the composed record for output.
    */
    fn emit(&self, record: Record);

    /**
    The application may imminently exit.  Ensure all buffers are flushed and up to date.
    */
    fn flush(&self);
}

/*
Boilerplate notes.

# Handler

Clone doesn't make sense for handlers, which typically hold unique resources.
PartialEq and Eq are possible but it's unclear whether we'd mean data equality or provenance; skip both.
Ord makes no sense.
Default is not necessarily sensible since who knows how the handler is constructed (does it need a formatter, a target, etc.)
Display is not very sensible.
Send/Sync are required: a single handler is shared by every thread logging through its logger.
*/
