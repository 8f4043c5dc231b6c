use std::ffi::c_void;

/// Number of traced driver entry points.
pub const FUNCTION_COUNT: usize = 118;

/// Upper bound on concurrently enabled tracing handles.
pub const MAX_HANDLES: usize = 16;

macro_rules! function_ids {
    ($($variant:ident = $id:literal => $name:literal,)*) => {
        /// Identifies one traced driver entry point.
        ///
        /// Identifiers are dense (`0..FUNCTION_COUNT`) and stable within a
        /// build. They index the per-handle opt-in mask and tag notification
        /// records.
        #[repr(u32)]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum FunctionId {
            $($variant = $id,)*
        }

        impl FunctionId {
            /// All identifiers, in numbering order.
            pub const ALL: [FunctionId; FUNCTION_COUNT] = [$(FunctionId::$variant,)*];

            /// Checked conversion from a raw identifier.
            pub fn from_u32(id: u32) -> Option<FunctionId> {
                Self::ALL.get(id as usize).copied()
            }

            /// Canonical name of the entry point, as reported to observers
            /// in [`CallbackData::function_name`].
            pub fn name(self) -> &'static str {
                match self {
                    $(FunctionId::$variant => $name,)*
                }
            }
        }
    };
}

function_ids! {
    BuildProgram = 0 => "clBuildProgram",
    CloneKernel = 1 => "clCloneKernel",
    CompileProgram = 2 => "clCompileProgram",
    CreateBuffer = 3 => "clCreateBuffer",
    CreateCommandQueue = 4 => "clCreateCommandQueue",
    CreateCommandQueueWithProperties = 5 => "clCreateCommandQueueWithProperties",
    CreateContext = 6 => "clCreateContext",
    CreateContextFromType = 7 => "clCreateContextFromType",
    CreateFromGlBuffer = 8 => "clCreateFromGLBuffer",
    CreateFromGlRenderbuffer = 9 => "clCreateFromGLRenderbuffer",
    CreateFromGlTexture = 10 => "clCreateFromGLTexture",
    CreateFromGlTexture2d = 11 => "clCreateFromGLTexture2D",
    CreateFromGlTexture3d = 12 => "clCreateFromGLTexture3D",
    CreateImage = 13 => "clCreateImage",
    CreateImage2d = 14 => "clCreateImage2D",
    CreateImage3d = 15 => "clCreateImage3D",
    CreateKernel = 16 => "clCreateKernel",
    CreateKernelsInProgram = 17 => "clCreateKernelsInProgram",
    CreatePipe = 18 => "clCreatePipe",
    CreateProgramWithBinary = 19 => "clCreateProgramWithBinary",
    CreateProgramWithBuiltInKernels = 20 => "clCreateProgramWithBuiltInKernels",
    CreateProgramWithIl = 21 => "clCreateProgramWithIL",
    CreateProgramWithSource = 22 => "clCreateProgramWithSource",
    CreateSampler = 23 => "clCreateSampler",
    CreateSamplerWithProperties = 24 => "clCreateSamplerWithProperties",
    CreateSubBuffer = 25 => "clCreateSubBuffer",
    CreateSubDevices = 26 => "clCreateSubDevices",
    CreateUserEvent = 27 => "clCreateUserEvent",
    EnqueueAcquireGlObjects = 28 => "clEnqueueAcquireGLObjects",
    EnqueueBarrier = 29 => "clEnqueueBarrier",
    EnqueueBarrierWithWaitList = 30 => "clEnqueueBarrierWithWaitList",
    EnqueueCopyBuffer = 31 => "clEnqueueCopyBuffer",
    EnqueueCopyBufferRect = 32 => "clEnqueueCopyBufferRect",
    EnqueueCopyBufferToImage = 33 => "clEnqueueCopyBufferToImage",
    EnqueueCopyImage = 34 => "clEnqueueCopyImage",
    EnqueueCopyImageToBuffer = 35 => "clEnqueueCopyImageToBuffer",
    EnqueueFillBuffer = 36 => "clEnqueueFillBuffer",
    EnqueueFillImage = 37 => "clEnqueueFillImage",
    EnqueueMapBuffer = 38 => "clEnqueueMapBuffer",
    EnqueueMapImage = 39 => "clEnqueueMapImage",
    EnqueueMarker = 40 => "clEnqueueMarker",
    EnqueueMarkerWithWaitList = 41 => "clEnqueueMarkerWithWaitList",
    EnqueueMigrateMemObjects = 42 => "clEnqueueMigrateMemObjects",
    EnqueueNdRangeKernel = 43 => "clEnqueueNDRangeKernel",
    EnqueueNativeKernel = 44 => "clEnqueueNativeKernel",
    EnqueueReadBuffer = 45 => "clEnqueueReadBuffer",
    EnqueueReadBufferRect = 46 => "clEnqueueReadBufferRect",
    EnqueueReadImage = 47 => "clEnqueueReadImage",
    EnqueueReleaseGlObjects = 48 => "clEnqueueReleaseGLObjects",
    EnqueueSvmFree = 49 => "clEnqueueSVMFree",
    EnqueueSvmMap = 50 => "clEnqueueSVMMap",
    EnqueueSvmMemFill = 51 => "clEnqueueSVMMemFill",
    EnqueueSvmMemcpy = 52 => "clEnqueueSVMMemcpy",
    EnqueueSvmMigrateMem = 53 => "clEnqueueSVMMigrateMem",
    EnqueueSvmUnmap = 54 => "clEnqueueSVMUnmap",
    EnqueueTask = 55 => "clEnqueueTask",
    EnqueueUnmapMemObject = 56 => "clEnqueueUnmapMemObject",
    EnqueueWaitForEvents = 57 => "clEnqueueWaitForEvents",
    EnqueueWriteBuffer = 58 => "clEnqueueWriteBuffer",
    EnqueueWriteBufferRect = 59 => "clEnqueueWriteBufferRect",
    EnqueueWriteImage = 60 => "clEnqueueWriteImage",
    Finish = 61 => "clFinish",
    Flush = 62 => "clFlush",
    GetCommandQueueInfo = 63 => "clGetCommandQueueInfo",
    GetContextInfo = 64 => "clGetContextInfo",
    GetDeviceAndHostTimer = 65 => "clGetDeviceAndHostTimer",
    GetDeviceIds = 66 => "clGetDeviceIDs",
    GetDeviceInfo = 67 => "clGetDeviceInfo",
    GetEventInfo = 68 => "clGetEventInfo",
    GetEventProfilingInfo = 69 => "clGetEventProfilingInfo",
    GetExtensionFunctionAddress = 70 => "clGetExtensionFunctionAddress",
    GetExtensionFunctionAddressForPlatform = 71 => "clGetExtensionFunctionAddressForPlatform",
    GetGlObjectInfo = 72 => "clGetGLObjectInfo",
    GetGlTextureInfo = 73 => "clGetGLTextureInfo",
    GetHostTimer = 74 => "clGetHostTimer",
    GetImageInfo = 75 => "clGetImageInfo",
    GetKernelArgInfo = 76 => "clGetKernelArgInfo",
    GetKernelInfo = 77 => "clGetKernelInfo",
    GetKernelSubGroupInfo = 78 => "clGetKernelSubGroupInfo",
    GetKernelWorkGroupInfo = 79 => "clGetKernelWorkGroupInfo",
    GetMemObjectInfo = 80 => "clGetMemObjectInfo",
    GetPipeInfo = 81 => "clGetPipeInfo",
    GetPlatformIds = 82 => "clGetPlatformIDs",
    GetPlatformInfo = 83 => "clGetPlatformInfo",
    GetProgramBuildInfo = 84 => "clGetProgramBuildInfo",
    GetProgramInfo = 85 => "clGetProgramInfo",
    GetSamplerInfo = 86 => "clGetSamplerInfo",
    GetSupportedImageFormats = 87 => "clGetSupportedImageFormats",
    LinkProgram = 88 => "clLinkProgram",
    ReleaseCommandQueue = 89 => "clReleaseCommandQueue",
    ReleaseContext = 90 => "clReleaseContext",
    ReleaseDevice = 91 => "clReleaseDevice",
    ReleaseEvent = 92 => "clReleaseEvent",
    ReleaseKernel = 93 => "clReleaseKernel",
    ReleaseMemObject = 94 => "clReleaseMemObject",
    ReleaseProgram = 95 => "clReleaseProgram",
    ReleaseSampler = 96 => "clReleaseSampler",
    RetainCommandQueue = 97 => "clRetainCommandQueue",
    RetainContext = 98 => "clRetainContext",
    RetainDevice = 99 => "clRetainDevice",
    RetainEvent = 100 => "clRetainEvent",
    RetainKernel = 101 => "clRetainKernel",
    RetainMemObject = 102 => "clRetainMemObject",
    RetainProgram = 103 => "clRetainProgram",
    RetainSampler = 104 => "clRetainSampler",
    SvmAlloc = 105 => "clSVMAlloc",
    SvmFree = 106 => "clSVMFree",
    SetCommandQueueProperty = 107 => "clSetCommandQueueProperty",
    SetDefaultDeviceCommandQueue = 108 => "clSetDefaultDeviceCommandQueue",
    SetEventCallback = 109 => "clSetEventCallback",
    SetKernelArg = 110 => "clSetKernelArg",
    SetKernelArgSvmPointer = 111 => "clSetKernelArgSVMPointer",
    SetKernelExecInfo = 112 => "clSetKernelExecInfo",
    SetMemObjectDestructorCallback = 113 => "clSetMemObjectDestructorCallback",
    SetUserEventStatus = 114 => "clSetUserEventStatus",
    UnloadCompiler = 115 => "clUnloadCompiler",
    UnloadPlatformCompiler = 116 => "clUnloadPlatformCompiler",
    WaitForEvents = 117 => "clWaitForEvents",
}

/// Distinguishes the notification made immediately before the traced work
/// from the one made immediately after.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Site {
    Enter = 0,
    Exit = 1,
}

/// Notification record delivered to each observer at both sites of a
/// traced call.
///
/// `correlation_id` pairs the enter notification with the exit notification
/// of the same call. `correlation_data` points at a per-handle 64-bit
/// scratch word the observer may use freely across the pair; it is valid
/// only until the exit notification returns. `function_params` is the
/// per-function parameter record produced by the entry-point shim; its
/// shape is owned by the shim layer. `function_return_value` is null at
/// enter and points at the return storage at exit.
#[derive(Clone, Debug)]
pub struct CallbackData {
    pub site: Site,
    pub correlation_id: u32,
    pub correlation_data: *mut u64,
    pub function_name: &'static str,
    pub function_params: *const c_void,
    pub function_return_value: *mut c_void,
}

/// Observer entry point.
///
/// Invoked with the traced function id, the notification record and the
/// user pointer supplied at handle creation. Callbacks may run concurrently
/// on different threads; nested calls into traced entry points from inside
/// a callback run untraced on the same thread.
pub type TracingCallback = fn(FunctionId, &CallbackData, *mut c_void);
