//! System V semaphore backend.
//!
//! Each named semaphore is a one-element System V semaphore set. Create-exclusive
//! maps to `semget(IPC_CREAT | IPC_EXCL)`, so key uniqueness is arbitrated by the
//! kernel across every process on the host.

use std::io;

use libc::{c_int, c_short};

use super::semaphore::{NamedBinarySemaphore, SemOptions, SemaphoreNamespace, SyncKey};
use crate::common::error::SemError;

/// The host's System V semaphore table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SysV;

/// A one-element System V semaphore set.
#[derive(Debug)]
pub struct SysVSemaphore {
    key: SyncKey,
    id: c_int,
}

fn last_errno() -> i32 {
    io::Error::last_os_error().raw_os_error().unwrap_or(0)
}

impl SysVSemaphore {
    /// Returns the kernel identifier of the semaphore set.
    pub const fn id(&self) -> c_int {
        self.id
    }

    /// Reads the current semaphore value.
    pub fn value(&self) -> Result<i32, SemError> {
        // SAFETY: GETVAL takes no fourth argument; `id` came from a successful semget.
        let val = unsafe { libc::semctl(self.id, 0, libc::GETVAL) };
        if val == -1 {
            return Err(self.os_error("semctl(GETVAL)", last_errno()));
        }
        Ok(val)
    }

    fn op(&self, delta: c_short) -> Result<(), SemError> {
        let mut buf = libc::sembuf {
            sem_num: 0,
            sem_op: delta,
            sem_flg: 0,
        };
        loop {
            // SAFETY: `buf` is a valid, exclusively borrowed sembuf and nsops is 1.
            let rc = unsafe { libc::semop(self.id, &mut buf, 1) };
            if rc == 0 {
                return Ok(());
            }
            match last_errno() {
                libc::EINTR => {}
                libc::EIDRM | libc::EINVAL => return Err(SemError::Removed { key: self.key }),
                errno => return Err(self.os_error("semop", errno)),
            }
        }
    }

    const fn os_error(&self, op: &'static str, errno: i32) -> SemError {
        SemError::Os {
            op,
            key: self.key,
            errno,
        }
    }
}

impl NamedBinarySemaphore for SysVSemaphore {
    fn key(&self) -> SyncKey {
        self.key
    }

    fn wait(&self) -> Result<(), SemError> {
        self.op(-1)
    }

    fn signal(&self) -> Result<(), SemError> {
        self.op(1)
    }

    fn remove(&self) -> Result<(), SemError> {
        // SAFETY: IPC_RMID takes no fourth argument.
        let rc = unsafe { libc::semctl(self.id, 0, libc::IPC_RMID) };
        if rc == -1 {
            return Err(self.os_error("semctl(IPC_RMID)", last_errno()));
        }
        Ok(())
    }
}

impl SemaphoreNamespace for SysV {
    type Semaphore = SysVSemaphore;

    fn create_exclusive(
        &self,
        key: SyncKey,
        options: &SemOptions,
    ) -> Result<SysVSemaphore, SemError> {
        let flags = libc::IPC_CREAT | libc::IPC_EXCL | (options.permissions & 0o777) as c_int;
        // SAFETY: plain system call with integer arguments.
        let id = unsafe { libc::semget(key.raw(), 1, flags) };
        if id == -1 {
            return match last_errno() {
                libc::EEXIST => Err(SemError::AlreadyExists { key }),
                errno => Err(SemError::Os {
                    op: "semget",
                    key,
                    errno,
                }),
            };
        }

        let sem = SysVSemaphore { key, id };
        // SAFETY: SETVAL reads an int-sized `union semun`; an int is passed in its place.
        let rc = unsafe { libc::semctl(id, 0, libc::SETVAL, c_int::from(options.initial)) };
        if rc == -1 {
            let err = sem.os_error("semctl(SETVAL)", last_errno());
            // Roll back the half-initialized set.
            let _ = sem.remove();
            return Err(err);
        }
        Ok(sem)
    }

    fn open(&self, key: SyncKey) -> Result<SysVSemaphore, SemError> {
        // SAFETY: plain system call with integer arguments.
        let id = unsafe { libc::semget(key.raw(), 1, 0) };
        if id == -1 {
            return match last_errno() {
                libc::ENOENT => Err(SemError::NotFound { key }),
                errno => Err(SemError::Os {
                    op: "semget",
                    key,
                    errno,
                }),
            };
        }
        Ok(SysVSemaphore { key, id })
    }
}
