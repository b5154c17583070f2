mod frame_sig;
mod sig;
mod sig_arith;
pub use frame_sig::{FrameSig, FrameSigT};
pub use sig::{Buf, ConstBuf, Filter, Sig, SigCtx, SigSampleIntoBufT, SigT};
